//! The snake record as exchanged with the catalog API.

use serde::{Deserialize, Serialize};

use crate::list_field::ListField;
use crate::wire::{self, WireText};

/// How dangerous a species is. The backend stores the Thai label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DangerLevel {
    High,
    Medium,
    Low,
    /// Any other label the backend returned; kept so edits don't drop it.
    Other(String),
}

impl DangerLevel {
    pub fn label(&self) -> &str {
        self.as_wire()
    }

    /// Next value in the select menu: unset → high → medium → low → unset.
    pub fn cycle(current: Option<&DangerLevel>) -> Option<DangerLevel> {
        match current {
            None | Some(DangerLevel::Other(_)) => Some(DangerLevel::High),
            Some(DangerLevel::High) => Some(DangerLevel::Medium),
            Some(DangerLevel::Medium) => Some(DangerLevel::Low),
            Some(DangerLevel::Low) => None,
        }
    }
}

impl WireText for DangerLevel {
    /// Only the exact labels the form writes map to named levels. Anything
    /// else is kept verbatim in `Other` so a save sends it back unchanged.
    fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "" => None,
            "มาก" => Some(DangerLevel::High),
            "ปานกลาง" => Some(DangerLevel::Medium),
            "น้อย" => Some(DangerLevel::Low),
            other => Some(DangerLevel::Other(other.to_string())),
        }
    }

    fn as_wire(&self) -> &str {
        match self {
            DangerLevel::High => "มาก",
            DangerLevel::Medium => "ปานกลาง",
            DangerLevel::Low => "น้อย",
            DangerLevel::Other(s) => s,
        }
    }
}

/// Whether the species is ready for image identification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentificationStatus {
    Identified,
    Unidentified,
    Other(String),
}

impl IdentificationStatus {
    pub fn label(&self) -> &str {
        match self {
            IdentificationStatus::Identified => "พร้อมจำแนก",
            IdentificationStatus::Unidentified => "ไม่พร้อมจำแนก",
            IdentificationStatus::Other(s) => s,
        }
    }

    /// Next value in the select menu: unset → identified → unidentified → unset.
    pub fn cycle(current: Option<&IdentificationStatus>) -> Option<IdentificationStatus> {
        match current {
            None | Some(IdentificationStatus::Other(_)) => Some(IdentificationStatus::Identified),
            Some(IdentificationStatus::Identified) => Some(IdentificationStatus::Unidentified),
            Some(IdentificationStatus::Unidentified) => None,
        }
    }
}

impl WireText for IdentificationStatus {
    fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "" => None,
            "identified" => Some(IdentificationStatus::Identified),
            "unidentified" => Some(IdentificationStatus::Unidentified),
            other => Some(IdentificationStatus::Other(other.to_string())),
        }
    }

    fn as_wire(&self) -> &str {
        match self {
            IdentificationStatus::Identified => "identified",
            IdentificationStatus::Unidentified => "unidentified",
            IdentificationStatus::Other(s) => s,
        }
    }
}

/// The four list-valued fields of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Habitat,
    Color,
    Diet,
    FirstAid,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [
        ListKind::Habitat,
        ListKind::Color,
        ListKind::Diet,
        ListKind::FirstAid,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ListKind::Habitat => "ถิ่นที่อยู่ (habitat)",
            ListKind::Color => "สี (color)",
            ListKind::Diet => "อาหาร (diet)",
            ListKind::FirstAid => "การปฐมพยาบาลเบื้องต้น (first_aid)",
        }
    }
}

/// Fields that must be filled in before a record is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequiredField {
    ThaiName,
    Binomial,
}

impl RequiredField {
    pub fn label(self) -> &'static str {
        match self {
            RequiredField::ThaiName => "ชื่อภาษาไทย",
            RequiredField::Binomial => "ชื่อสายพันธุ์ (binomial)",
        }
    }
}

/// A snake species record.
///
/// List fields are always normalized on decode (see [`crate::normalize_list_value`]).
/// The backend id is read but never sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeRecord {
    #[serde(
        rename = "_id",
        default,
        skip_serializing,
        deserialize_with = "wire::lenient_id"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub thai_name: String,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub binomial: String,
    #[serde(default)]
    pub habitat: ListField,
    #[serde(default)]
    pub color: ListField,
    #[serde(default)]
    pub diet: ListField,
    #[serde(default, with = "wire::venom_flag")]
    pub is_venomous: bool,
    #[serde(default, with = "wire::optional_text")]
    pub danger_level: Option<DangerLevel>,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub description: String,
    #[serde(rename = "imageUrl", default, deserialize_with = "wire::lenient_text")]
    pub image_url: String,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub size: String,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub pattern: String,
    #[serde(default, with = "wire::optional_text")]
    pub status: Option<IdentificationStatus>,
    #[serde(default, deserialize_with = "wire::lenient_text")]
    pub venom_effects: String,
    #[serde(default)]
    pub first_aid: ListField,
}

impl SnakeRecord {
    /// Fields left blank that the form requires, in form order.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        let mut missing = Vec::new();
        if self.thai_name.trim().is_empty() {
            missing.push(RequiredField::ThaiName);
        }
        if self.binomial.trim().is_empty() {
            missing.push(RequiredField::Binomial);
        }
        missing
    }

    pub fn list(&self, kind: ListKind) -> &ListField {
        match kind {
            ListKind::Habitat => &self.habitat,
            ListKind::Color => &self.color,
            ListKind::Diet => &self.diet,
            ListKind::FirstAid => &self.first_aid,
        }
    }

    pub fn set_list(&mut self, kind: ListKind, value: ListField) {
        match kind {
            ListKind::Habitat => self.habitat = value,
            ListKind::Color => self.color = value,
            ListKind::Diet => self.diet = value,
            ListKind::FirstAid => self.first_aid = value,
        }
    }

    /// Display name for cards and dialogs.
    pub fn display_name(&self) -> &str {
        if self.thai_name.trim().is_empty() {
            "ไม่มีชื่อ"
        } else {
            &self.thai_name
        }
    }
}

impl Default for SnakeRecord {
    fn default() -> Self {
        Self {
            id: None,
            thai_name: String::new(),
            binomial: String::new(),
            habitat: ListField::single_empty(),
            color: ListField::single_empty(),
            diet: ListField::single_empty(),
            is_venomous: false,
            danger_level: None,
            description: String::new(),
            image_url: String::new(),
            size: String::new(),
            pattern: String::new(),
            status: None,
            venom_effects: String::new(),
            first_aid: ListField::single_empty(),
        }
    }
}

/// Response body of `GET /snakes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnakeList {
    #[serde(default, deserialize_with = "snakes_or_empty")]
    pub snakes: Vec<SnakeRecord>,
}

fn snakes_or_empty<'de, D>(deserializer: D) -> Result<Vec<SnakeRecord>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SnakeRecord>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_backend_record_with_mixed_shapes() {
        let raw = json!({
            "_id": {"$oid": "66aa"},
            "thai_name": "งูเห่า",
            "binomial": "Naja kaouthia",
            "habitat": "ป่า, ทุ่งนา",
            "color": ["ดำ", "น้ำตาล"],
            "is_venomous": true,
            "danger_level": "มาก",
            "imageUrl": "https://img/1.jpg",
            "status": "identified",
            "first_aid": null
        });
        let record: SnakeRecord = serde_json::from_value(raw).unwrap();

        assert_eq!(record.id.as_deref(), Some("66aa"));
        assert_eq!(record.habitat.entries(), ["ป่า", "ทุ่งนา"]);
        assert_eq!(record.color.entries(), ["ดำ", "น้ำตาล"]);
        assert_eq!(record.diet.entries(), [""]);
        assert_eq!(record.first_aid.entries(), [""]);
        assert!(record.is_venomous);
        assert_eq!(record.danger_level, Some(DangerLevel::High));
        assert_eq!(record.status, Some(IdentificationStatus::Identified));
        assert_eq!(record.image_url, "https://img/1.jpg");
        assert_eq!(record.description, "");
    }

    #[test]
    fn encodes_payload_in_backend_shape() {
        let record = SnakeRecord {
            id: Some("abc".into()),
            thai_name: "งูเขียวหางไหม้".into(),
            binomial: "Trimeresurus albolabris".into(),
            is_venomous: true,
            danger_level: Some(DangerLevel::Medium),
            ..SnakeRecord::default()
        };
        let value = serde_json::to_value(&record).unwrap();

        assert!(value.get("_id").is_none());
        assert_eq!(value["is_venomous"], json!(1));
        assert_eq!(value["danger_level"], json!("ปานกลาง"));
        assert_eq!(value["status"], json!(""));
        assert_eq!(value["habitat"], json!([""]));
        assert_eq!(value["imageUrl"], json!(""));
    }

    #[test]
    fn venom_flag_accepts_numbers_and_strings() {
        for (raw, expected) in [
            (json!(1), true),
            (json!(0), false),
            (json!("1"), true),
            (json!("0"), false),
            (json!(null), false),
        ] {
            let record: SnakeRecord =
                serde_json::from_value(json!({ "binomial": "x", "is_venomous": raw })).unwrap();
            assert_eq!(record.is_venomous, expected, "input: {raw}");
        }
    }

    #[test]
    fn unknown_danger_label_survives_round_trip() {
        let record: SnakeRecord =
            serde_json::from_value(json!({ "danger_level": "สูงมาก" })).unwrap();
        assert_eq!(
            record.danger_level,
            Some(DangerLevel::Other("สูงมาก".to_string()))
        );
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["danger_level"], json!("สูงมาก"));
    }

    #[test]
    fn english_or_padded_danger_labels_are_sent_back_verbatim() {
        for raw in ["high", "Medium", " low ", " มาก"] {
            let record: SnakeRecord = serde_json::from_value(
                json!({ "binomial": "Naja naja", "danger_level": raw }),
            )
            .unwrap();
            assert_eq!(
                record.danger_level,
                Some(DangerLevel::Other(raw.to_string())),
                "input: {raw:?}"
            );
            let value = serde_json::to_value(&record).unwrap();
            assert_eq!(value["danger_level"], json!(raw));
        }
    }

    #[test]
    fn status_label_is_sent_back_verbatim() {
        let record: SnakeRecord =
            serde_json::from_value(json!({ "status": "identified " })).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], json!("identified "));
    }

    #[test]
    fn numeric_text_fields_are_sent_back_as_strings() {
        let record: SnakeRecord =
            serde_json::from_value(json!({ "binomial": "Naja naja", "size": 150, "pattern": null }))
                .unwrap();
        assert_eq!(record.size, "150");
        assert_eq!(record.pattern, "");

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["size"], json!("150"));
        assert_eq!(value["pattern"], json!(""));
    }

    #[test]
    fn missing_required_reports_blank_names() {
        let mut record = SnakeRecord::default();
        assert_eq!(
            record.missing_required(),
            vec![RequiredField::ThaiName, RequiredField::Binomial]
        );
        record.thai_name = "งูสิง".into();
        record.binomial = "  ".into();
        assert_eq!(record.missing_required(), vec![RequiredField::Binomial]);
        record.binomial = "Ptyas korros".into();
        assert!(record.missing_required().is_empty());
    }

    #[test]
    fn select_cycles_wrap_back_to_unset() {
        let mut level = None;
        let mut seen = Vec::new();
        for _ in 0..4 {
            level = DangerLevel::cycle(level.as_ref());
            seen.push(level.clone());
        }
        assert_eq!(
            seen,
            vec![
                Some(DangerLevel::High),
                Some(DangerLevel::Medium),
                Some(DangerLevel::Low),
                None
            ]
        );

        let status = IdentificationStatus::cycle(None);
        assert_eq!(status, Some(IdentificationStatus::Identified));
        assert_eq!(IdentificationStatus::cycle(status.as_ref()), Some(IdentificationStatus::Unidentified));
    }

    #[test]
    fn snake_list_tolerates_missing_or_null_array() {
        let list: SnakeList = serde_json::from_str("{}").unwrap();
        assert!(list.snakes.is_empty());
        let list: SnakeList = serde_json::from_str(r#"{"snakes": null}"#).unwrap();
        assert!(list.snakes.is_empty());
    }

    #[test]
    fn display_name_falls_back_for_blank_thai_name() {
        let record = SnakeRecord::default();
        assert_eq!(record.display_name(), "ไม่มีชื่อ");
    }
}
