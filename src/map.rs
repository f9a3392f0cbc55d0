//! Map pins and the admin map editor.
//!
//! Positions are percentages of the map image, stored the way the portal has
//! always stored them: strings with one decimal and a trailing `%`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityNode {
    pub id: String,
    pub name: String,
    pub top: String,
    pub left: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
}

impl CityNode {
    /// (x, y) in percent; unparsable coordinates read as 0.
    pub fn position(&self) -> (f32, f32) {
        (
            parse_percent(&self.left).unwrap_or(0.0),
            parse_percent(&self.top).unwrap_or(0.0),
        )
    }
}

pub fn clamp_percent(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// `37.25` -> `"37.3%"`. Halves round away from zero.
pub fn format_percent(v: f32) -> String {
    let rounded = (f64::from(v) * 10.0).round() / 10.0;
    format!("{rounded:.1}%")
}

pub fn parse_percent(text: &str) -> Option<f32> {
    text.trim().trim_end_matches('%').trim().parse().ok()
}

pub fn default_cities() -> Vec<CityNode> {
    let seed = [
        ("Нуук-Прайм", "62.0%", "38.5%", "Столица цифровой нации. Центр управления ядром."),
        ("Илулиссат-Дата", "41.5%", "44.0%", "Северный дата-центр на ледяном охлаждении."),
        ("Кангерлуссуак-Хаб", "55.0%", "46.5%", "Транспортный узел и шлюз иммиграции."),
        ("Тасиилак-Лаб", "58.5%", "70.0%", "Лаборатория нейросетевых исследований."),
        ("Кааанаак-Аркив", "18.0%", "33.0%", "Архив законов и конституции."),
    ];
    seed.iter()
        .enumerate()
        .map(|(i, (name, top, left, description))| CityNode {
            id: format!("city-{i}"),
            name: name.to_string(),
            top: top.to_string(),
            left: left.to_string(),
            logo: None,
            description: Some(description.to_string()),
            link: None,
            link_text: None,
        })
        .collect()
}

/// Requested changes to the shared map state, committed by the shell.
#[derive(Debug, Clone, PartialEq)]
pub enum MapIntent {
    Place { x: f32, y: f32 },
    Move { id: String, x: f32, y: f32 },
    Update(CityNode),
    Delete(String),
    SetImage(String),
}

/// Apply a map intent to the city list. Returns the id of a newly placed
/// node. `now_ms` seeds the id of placed nodes; it is bumped until unique.
pub fn apply_map_intent(
    cities: &mut Vec<CityNode>,
    intent: &MapIntent,
    now_ms: i64,
) -> Option<String> {
    match intent {
        MapIntent::Place { x, y } => {
            let mut stamp = now_ms;
            let mut id = format!("city-{stamp}");
            while cities.iter().any(|c| c.id == id) {
                stamp += 1;
                id = format!("city-{stamp}");
            }
            cities.push(CityNode {
                id: id.clone(),
                name: "New Node".to_string(),
                top: format_percent(clamp_percent(*y)),
                left: format_percent(clamp_percent(*x)),
                logo: None,
                description: None,
                link: None,
                link_text: None,
            });
            Some(id)
        }
        MapIntent::Move { id, x, y } => {
            if let Some(city) = cities.iter_mut().find(|c| &c.id == id) {
                city.left = format_percent(clamp_percent(*x));
                city.top = format_percent(clamp_percent(*y));
            }
            None
        }
        MapIntent::Update(node) => {
            if let Some(city) = cities.iter_mut().find(|c| c.id == node.id) {
                *city = node.clone();
            }
            None
        }
        MapIntent::Delete(id) => {
            cities.retain(|c| &c.id != id);
            None
        }
        MapIntent::SetImage(_) => None,
    }
}

/// Local UI state of the map tab: the node open in the side form and the
/// node being dragged.
#[derive(Debug, Clone, Default)]
pub struct MapEditor {
    pub selected: Option<CityNode>,
    dragging: Option<String>,
    pub image_input: String,
}

impl MapEditor {
    pub fn dragging(&self) -> Option<&str> {
        self.dragging.as_deref()
    }

    /// Click on empty map. Ignored while a drag is in progress.
    pub fn click(&self, x: f32, y: f32) -> Option<MapIntent> {
        if self.dragging.is_some() {
            return None;
        }
        Some(MapIntent::Place { x, y })
    }

    /// After the shell has placed a node, open it in the form.
    pub fn placed(&mut self, cities: &[CityNode], id: &str) {
        self.selected = cities.iter().find(|c| c.id == id).cloned();
    }

    pub fn select(&mut self, city: &CityNode) {
        self.selected = Some(city.clone());
    }

    pub fn begin_drag(&mut self, id: &str) {
        self.dragging = Some(id.to_string());
    }

    pub fn drag_to(&self, x: f32, y: f32) -> Option<MapIntent> {
        self.dragging.as_ref().map(|id| MapIntent::Move {
            id: id.clone(),
            x: clamp_percent(x),
            y: clamp_percent(y),
        })
    }

    pub fn end_drag(&mut self) {
        self.dragging = None;
    }

    /// Form edits are live: every change to the open node is pushed to the
    /// shared list immediately.
    pub fn edit_selected(&mut self, edit: impl FnOnce(&mut CityNode)) -> Option<MapIntent> {
        let city = self.selected.as_mut()?;
        edit(city);
        Some(MapIntent::Update(city.clone()))
    }

    /// Keep the open form in step with moves made by dragging.
    pub fn sync_selected(&mut self, cities: &[CityNode]) {
        if let Some(selected) = self.selected.as_mut()
            && let Some(city) = cities.iter().find(|c| c.id == selected.id)
        {
            selected.top = city.top.clone();
            selected.left = city.left.clone();
        }
    }

    pub fn delete(&mut self, id: &str) -> MapIntent {
        if self.selected.as_ref().is_some_and(|c| c.id == id) {
            self.selected = None;
        }
        MapIntent::Delete(id.to_string())
    }

    pub fn set_image(&mut self) -> Option<MapIntent> {
        let url = self.image_input.trim();
        if url.is_empty() {
            return None;
        }
        let intent = MapIntent::SetImage(url.to_string());
        self.image_input.clear();
        Some(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::{CityNode, MapEditor, MapIntent, apply_map_intent, default_cities, format_percent};

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(37.25), "37.3%");
        assert_eq!(format_percent(12.75), "12.8%");
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
    }

    #[test]
    fn placed_nodes_get_unique_ids_even_on_same_millisecond() {
        let mut cities = Vec::new();
        let a = apply_map_intent(&mut cities, &MapIntent::Place { x: 1.0, y: 2.0 }, 1000).unwrap();
        let b = apply_map_intent(&mut cities, &MapIntent::Place { x: 3.0, y: 4.0 }, 1000).unwrap();
        assert_ne!(a, b);
        assert_eq!(cities[0].name, "New Node");
        assert_eq!(cities[0].left, "1.0%");
        assert_eq!(cities[0].top, "2.0%");
    }

    #[test]
    fn drag_is_clamped_into_the_map() {
        let mut cities = default_cities();
        let mut editor = MapEditor::default();
        editor.begin_drag("city-0");
        let intent = editor.drag_to(120.0, -5.0).unwrap();
        apply_map_intent(&mut cities, &intent, 0);
        editor.end_drag();
        assert_eq!(cities[0].left, "100.0%");
        assert_eq!(cities[0].top, "0.0%");
        assert!(editor.click(5.0, 5.0).is_some());
    }

    #[test]
    fn form_edits_apply_immediately() {
        let mut cities = default_cities();
        let mut editor = MapEditor::default();
        editor.select(&cities[2]);
        let intent = editor
            .edit_selected(|c| c.name = "Нуук-2".to_string())
            .unwrap();
        apply_map_intent(&mut cities, &intent, 0);
        assert_eq!(cities[2].name, "Нуук-2");
        assert_eq!(editor.selected.as_ref().unwrap().name, "Нуук-2");
    }

    #[test]
    fn click_while_dragging_places_nothing() {
        let mut editor = MapEditor::default();
        editor.begin_drag("city-0");
        assert_eq!(editor.click(5.0, 5.0), None);
    }

    #[test]
    fn deleting_selected_node_closes_form() {
        let mut editor = MapEditor::default();
        let city: CityNode = default_cities().remove(1);
        editor.select(&city);
        assert_eq!(editor.delete(&city.id), MapIntent::Delete(city.id.clone()));
        assert!(editor.selected.is_none());
    }

    #[test]
    fn optional_fields_use_camel_case_and_are_skipped_when_empty() {
        let mut city = default_cities().remove(0);
        city.description = None;
        city.link_text = Some("Открыть".into());
        let json = serde_json::to_string(&city).unwrap();
        assert!(json.contains("\"linkText\""));
        assert!(!json.contains("description"));
    }
}
