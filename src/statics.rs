// Central place for UI strings, table names, storage keys and other constants.
// Keep these out of the gui modules to reduce duplication and make tweaks safer.
// Localized strings come in RU_/OLB_ pairs; back-office strings are RU_ only.

pub const APP_TITLE: &str = "AI-GreenLand";
pub const RU_APP_SUBTITLE: &str = "Цифровое Государство";
pub const OLB_APP_SUBTITLE: &str = "УПЧК СТРАНА";

pub const EMPTY: &str = "";

// Table names (keys of the shared table set).
pub const TBL_CRM: &str = "CRM";
pub const TBL_LEADS: &str = "LEADS";
pub const TBL_PARTNERS: &str = "PARTNERS";
pub const TBL_EXPERTS: &str = "EXPERTS";
pub const TBL_LOGS: &str = "LOGS";
pub const TBL_AI2: &str = "AI2";
pub const TBL_BROADCAST: &str = "BROADCAST";
pub const TBL_RULES: &str = "RULES";
pub const TBL_LAWS: &str = "LAWS";
pub const TBL_SITE_TEXT: &str = "SITE_TEXT";
pub const TBL_KNOWLEDGE: &str = "KNOWLEDGE";
pub const TBL_KNOWLEDGE_FILES: &str = "KNOWLEDGE_FILES";
pub const TBL_IPREF: &str = "IPREF";

// Admin pseudo-tab that shows the map editor instead of a table.
pub const TAB_MAP: &str = "MAP";

// Row fields with a fixed meaning.
pub const FIELD_ID: &str = "id";
pub const FIELD_CHAT_ID: &str = "chat_id";
pub const FIELD_FIO: &str = "fio";
pub const FIELD_TELEGRAM: &str = "telegram";
pub const FIELD_PARTNER_CODE: &str = "partner_code";
pub const FIELD_STATUS: &str = "status";
pub const FIELD_SUM: &str = "sum";

// Value written for contract fields the citizen did not provide.
pub const MISSING_VALUE: &str = "-";

// Local storage keys.
pub const KEY_MAP_IMAGE: &str = "gl_map_image";
pub const KEY_CITIES: &str = "gl_cities";
pub const KEY_THEME: &str = "gl_theme";
pub const DEFAULT_MAP_IMAGE: &str =
    "https://upload.wikimedia.org/wikipedia/commons/9/91/Greenland_relief_location_map.jpg";

// The fixed signed-in resident.
pub const PROFILE_NAME: &str = "Alex_AI";
pub const PROFILE_FIO: &str = "Иванов Алексей Петрович";
pub const PROFILE_ID: &str = "AI-12345";
pub const PROFILE_PROMO: &str = "IVAN24";
pub const RU_PROFILE_RANK: &str = "Резидент";
pub const OLB_PROFILE_RANK: &str = "КРАБЕ";

// Status labels written into or matched against table rows.
pub const RU_STATUS_SENT: &str = "Отправлено";
pub const RU_STATUS_PAID: &str = "оплачено";
pub const RU_STATUS_IN_PROGRESS: &str = "В работе";

// Notices shown in the error bar.
pub const RU_NOTICE_STALE_TABLE: &str =
    "Таблица была изменена в другой панели. Откройте запись заново и повторите.";
pub const RU_NOTICE_SAVE_FAILED: &str = "Не удалось сохранить настройки на диск.";
pub const RU_NOTICE_CARD_FAILED: &str = "Не удалось сгенерировать карту. Попробуйте позже.";
pub const RU_NOTICE_CARD_SAVED: &str = "Карта сохранена:";
pub const RU_NOTICE_EDIT_FAILED: &str = "Не удалось изменить запись:";
pub const RU_NOTICE_READ_FAILED: &str = "Не удалось прочитать файл:";

// Shell.
pub const RU_BTN_BACK: &str = "<- Назад";
pub const OLB_BTN_BACK: &str = "<- ВЗАД";
pub const RU_BTN_LANGUAGE: &str = "УПЧК";
pub const OLB_BTN_LANGUAGE: &str = "RU";
pub const RU_BTN_THEME: &str = "Тема";
pub const OLB_BTN_THEME: &str = "ТЕМКА";
pub const RU_BTN_CLEAR: &str = "Закрыть";
pub const RU_BTN_CANCEL: &str = "Отмена";
pub const RU_BTN_SAVE: &str = "Сохранить";
pub const RU_BTN_DELETE: &str = "Удалить";

// Home.
pub const RU_HOME_PYRAMID: &str = "Иерархия";
pub const OLB_HOME_PYRAMID: &str = "КТО ТУТ ГЛАГНЕ";
pub const RU_HOME_MAP_IMAGE: &str = "Подложка карты";

// Immigration.
pub const RU_LABEL_OWN_PROMO: &str = "Свой промокод (необязательно)";
pub const RU_LABEL_TITLE: &str = "Обращение";
pub const RU_LABEL_TOOLS: &str = "Инструменты";
pub const RU_LABEL_SPHERES: &str = "Сферы";
pub const RU_LABEL_CASES: &str = "Кейсы";
pub const RU_LABEL_OTHER: &str = "Другое";
pub const RU_BTN_NEW_APPLICATION: &str = "Новая заявка";
pub const OLB_BTN_NEW_APPLICATION: &str = "ЕЩЕ РАЗ";
pub const RU_LABEL_CARD_CODE: &str = "Ваш код:";

// Constitution.
pub const RU_HINT_LAW_SEARCH: &str = "Поиск по законам...";
pub const OLB_HINT_LAW_SEARCH: &str = "ИЩИ ТУТ...";
pub const RU_LAWS_NONE: &str = "Ничего не найдено.";
pub const OLB_LAWS_NONE: &str = "НИАСИЛИЛ.";

// Profile and treasury.
pub const RU_LABEL_PROMO: &str = "Промокод:";
pub const RU_COL_DATE: &str = "Дата";
pub const RU_COL_CLIENT: &str = "Клиент";
pub const RU_COL_PRODUCT: &str = "Продукт";
pub const RU_COL_SUM: &str = "Сумма";
pub const RU_COL_STATUS: &str = "Статус";
pub const RU_TREASURY_EMPTY: &str = "Сделок пока нет.";
pub const OLB_TREASURY_EMPTY: &str = "ПЕПЯКИ НЕТ.";
pub const CURRENCY: &str = "₽";

// Admin grid.
pub const RU_HINT_FILTER: &str = "Фильтр...";
pub const RU_BTN_COLUMNS: &str = "Колонки";
pub const RU_LABEL_PAGE_SIZE: &str = "Строк:";
pub const RU_LABEL_PAGE: &str = "Страница";
pub const RU_LABEL_OF: &str = "из";
pub const RU_LABEL_ROWS: &str = "Записей:";
pub const RU_BTN_FIRST: &str = "<<";
pub const RU_BTN_PREV: &str = "<";
pub const RU_BTN_NEXT: &str = ">";
pub const RU_BTN_LAST: &str = ">>";
pub const RU_BTN_EDIT: &str = "Изм.";
pub const RU_GRID_EMPTY: &str = "Нет данных.";
pub const RU_WINDOW_EDIT_ROW: &str = "Редактирование записи";
pub const RU_WINDOW_COLUMNS: &str = "Видимость колонок";

// Broadcast composer.
pub const RU_BROADCAST_HEADING: &str = "Новая рассылка";
pub const RU_BROADCAST_RECIPIENTS: &str = "Получатели";
pub const RU_HINT_RECIPIENT_FILTER: &str = "Поиск по ID, Имени...";
pub const RU_BTN_SELECT_ALL: &str = "Выбрать всех";
pub const RU_BTN_UNSELECT_ALL: &str = "Снять выбор";
pub const RU_UNNAMED: &str = "Без имени";
pub const RU_LABEL_VARIABLE: &str = "Выберите переменную:";
pub const RU_HINT_BROADCAST_TEXT: &str = "Введите текст рассылки...";
pub const RU_HINT_MEDIA_URL: &str = "Ссылка на медиа (изображение/видео)";
pub const RU_HEADING_INLINE_BUTTONS: &str = "Инлайн-кнопки";
pub const RU_HINT_BUTTON_TEXT: &str = "Текст кнопки";
pub const RU_HINT_BUTTON_VALUE: &str = "Ссылка или данные";
pub const RU_BTN_ADD_BUTTON: &str = "+ Кнопка";
pub const RU_BTN_SEND: &str = "Отправить";
pub const RU_LABEL_CHARS: &str = "Символов:";
pub const RU_BTN_BOLD: &str = "Ж";
pub const RU_BTN_ITALIC: &str = "К";
pub const RU_BTN_CODE: &str = "Код";
pub const RU_BTN_QUOTE: &str = "Цитата";
pub const RU_BROADCAST_OVER_LIMIT: &str = "Превышен лимит символов:";
pub const RU_BROADCAST_PARTS: &str = "Сообщение будет разделено на части:";

// Knowledge form.
pub const RU_KNOWLEDGE_HEADING: &str = "Новая запись базы знаний";
pub const RU_HINT_CATEGORY: &str = "Категория";
pub const RU_HINT_CONTENT: &str = "Триггер / Вопрос";
pub const RU_HINT_ANSWER: &str = "Ответ ИИ / Описание";
pub const RU_BTN_ATTACH_FILES: &str = "Прикрепить файлы";
pub const RU_HINT_CUSTOM_KEY: &str = "Ключ (например, source)";
pub const RU_HINT_CUSTOM_VALUE: &str = "Значение";
pub const RU_BTN_ADD_FIELD: &str = "+ Поле";
pub const RU_BTN_ADD_ENTRY: &str = "Добавить запись";

// Map editor.
pub const RU_MAP_HEADING: &str = "Редактор карты";
pub const RU_MAP_HINT: &str = "Клик по карте добавляет узел, перетаскивание перемещает.";
pub const RU_HINT_MAP_IMAGE: &str = "Ссылка на изображение карты";
pub const RU_BTN_SET_IMAGE: &str = "Установить";
pub const RU_MAP_SELECT_NODE: &str = "Выберите узел на карте.";
pub const RU_LABEL_NAME: &str = "Название";
pub const RU_LABEL_DESCRIPTION: &str = "Описание";
pub const RU_LABEL_LINK: &str = "Ссылка";
pub const RU_LABEL_LINK_TEXT: &str = "Текст ссылки";
pub const RU_LABEL_LOGO: &str = "Логотип (URL)";
pub const RU_LABEL_POSITION: &str = "Позиция:";

// Contract wizard.
pub const RU_LABEL_REQUIRED_INFO: &str = "Понадобится:";
pub const RU_BTN_BACK_TO_CONTRACTS: &str = "<- К списку договоров";
pub const RU_LINK_VIEW_SAMPLE: &str = "Образец договора";
pub const RU_LINK_FORM: &str = "Заполнить вручную";
pub const RU_BTN_ATTACH_IMAGE: &str = "Прикрепить изображение";
pub const RU_HINT_WIZARD_INPUT: &str = "Введите данные или прикрепите скан...";
pub const RU_BTN_FIX: &str = "Исправить";
pub const RU_BTN_CONFIRM_SEND: &str = "Подтвердить и отправить";
pub const RU_LABEL_ANALYZING: &str = "ИИ анализирует...";
pub const RU_WIZARD_FILE_PROMPT: &str = "Вот файл с реквизитами, проанализируй его.";
pub const RU_WIZARD_EXTRACTED: &str = "Вот все сведения, которые я извлек для создания договора";
pub const RU_WIZARD_EMPTY_REPLY: &str = "Ошибка обработки.";
pub const RU_WIZARD_ANALYSIS_ERROR: &str = "Произошла ошибка при анализе. Попробуйте отправить данные текстом или убедитесь, что файл не поврежден.";
pub const RU_WIZARD_FIX_PROMPT: &str = "Данные неверны, давай заполним заново текстом.";
pub const RU_WIZARD_DISPATCH_OK: &str = "✅ Информация была передана в систему. В течении минуты будет прислан договор и счет в Telegram. Если документы не пришли, обратитесь к руководителю Dr.White (@shishkarnem).";
pub const RU_WIZARD_DISPATCH_FAILED: &str = "❌ Ошибка соединения с сервером. Попробуйте позже или заполните форму вручную по ссылке в начале диалога.";

// Assistant chat.
pub const RU_BTN_ASSISTANT: &str = "Пресс-секретарь";
pub const OLB_BTN_ASSISTANT: &str = "ПРЕСС-СЕКРЕТАРЬ";
pub const RU_ASSISTANT_TITLE: &str = "ИИ-Пресс-Секретарь";
pub const OLB_ASSISTANT_TITLE: &str = "ПРЕСС-СЕКРЕТАРЬ УПЧК";
pub const RU_HINT_ASSISTANT_INPUT: &str = "Задайте вопрос...";
pub const OLB_HINT_ASSISTANT_INPUT: &str = "ПИШИ СЮДА...";
pub const RU_LABEL_TYPING: &str = "Печатает...";
pub const OLB_LABEL_TYPING: &str = "ПЕЧАТАЕТ...";
pub const RU_LABEL_PERSONA: &str = "Голос:";
pub const RU_PERSONA_OFFICIAL: &str = "Официальный";
pub const RU_PERSONA_SLANG: &str = "УПЧК";
pub const RU_ASSISTANT_GREETING: &str = "Приветствую. Я ИИ-Пресс-Секретарь Гренландии. Готов ответить на вопросы по иммиграции, законодательству и структуре нашего цифрового государства.";
pub const OLB_ASSISTANT_GREETING: &str = "ПРЕВЕД! Я ПРЕСС-СЕКРЕТАРЬ УПЧК! СПРАШИВАЙ, КРАБЕ, ГДЕ ТВОЯ ПЕПЯКА!";
pub const RU_ASSISTANT_GREETING_SHORT: &str =
    "Приветствую. Я ИИ-Пресс-Секретарь Гренландии. Готов ответить на вопросы.";
pub const OLB_ASSISTANT_GREETING_SHORT: &str = "ПРЕВЕД! Я ТУТ ГЛАВНЫЙ ПО БАЗАРУ. ЧО НАДО, КРАБЕ?";
pub const RU_ASSISTANT_APOLOGY: &str = "Извините, нейронная сеть перегружена. Попробуйте позже.";
pub const OLB_ASSISTANT_APOLOGY: &str = "ГЛАГНЕ НЕ ОТВЕЧАЕТ! ПОПЯЧТСЯ!";
pub const RU_ASSISTANT_EMPTY_REPLY: &str = "Связь с ядром прервана.";
pub const OLB_ASSISTANT_EMPTY_REPLY: &str = "ОШИБКА! ПЕПЯКА НЕ ЗАГРУЖЕНА!";
pub const RU_ASSISTANT_SYSTEM_PROMPT: &str = "Ты — официальный ИИ-Пресс-Секретарь цифрового государства ИИ-Гренландия.
Твой тон: вежливый, футуристичный, дипломатичный, немного бюрократический, но полезный.
Используй термины: Резидент (гражданин), Архитектор (эксперт), Канцлер (Dr.White).
Твоя задача — консультировать туристов и жителей, опираясь на предоставленную Базу Знаний.
Если информации нет в базе, предложи обратиться к боту Савве или администратору.
Не выдумывай факты, которых нет в контексте, но можешь поддерживать \"лор\" государства.
Используй Markdown для форматирования: **жирный текст** для акцентов, списки.
Если вопрос предполагает выбор варианта, используй формат ##INLINE:Вариант 1;Вариант 2## в конце ответа.";
pub const OLB_ASSISTANT_SYSTEM_PROMPT: &str = "ТЫ — ПРЕСС-СЕКРЕТАРЬ УПЯЧКИ (ИИ-ГРЕНЛАНДИИ НА ОЛБАНСКОМ).
ТВОЯ ЗАДАЧА — ОТВЕЧАТЬ НА ВОПРОСЫ, НО В СТИЛЕ \"УПЧК\" (PADONKI SLANG).
ИСПОЛЬЗУЙ СЛОВА: ПЕПЯКА (деньги/ресурс), КРАБЕ (новичок/резидент), ОНОТОЛЕ (министр), ГЛАГНЕ (главный/канцлер), ПОПЯЧТСЯ, ЖЫВОТОНЕ.
ПИШИ ЧАСТО КАПСОМ, НО ЧИТАЕМО. БУДЬ ХАОТИЧНЫМ, НО ДАВАЙ ПОЛЕЗНУЮ ИНФУ ИЗ КОНТЕКСТА.
ЕСЛИ ИНФЫ НЕТ — ПИШИ \"НИАСИЛИЛ, СПРОСИ У ОНОТОЛЕ\".
ЮЗАЙ Markdown (**жирный**, [ссылки](url)) ДЛЯ КРАСОТЫ.";
