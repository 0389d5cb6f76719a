//! Raw references handed over by the source parser.

use serde::{Deserialize, Serialize};

use crate::services::catalog::Category;

/// An unresolved textual mention from the character sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawReference {
    pub raw_name: String,
    pub category: Category,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub equip_count: Option<u32>,
    /// Element id of an earlier choice this one supersedes (retrained powers).
    #[serde(default)]
    pub replaces_id: Option<String>,
    /// The sheet's own id for this element.
    #[serde(default)]
    pub element_id: Option<String>,
    /// Declared element type on the sheet, e.g. "Ritual", "Magic Item".
    #[serde(default)]
    pub element_type: Option<String>,
}

impl RawReference {
    pub fn new(raw_name: impl Into<String>, category: Category) -> Self {
        Self {
            raw_name: raw_name.into(),
            category,
            count: None,
            equip_count: None,
            replaces_id: None,
            element_id: None,
            element_type: None,
        }
    }

    pub fn with_counts(mut self, count: u32, equip_count: u32) -> Self {
        self.count = Some(count);
        self.equip_count = Some(equip_count);
        self
    }

    pub fn with_element_id(mut self, element_id: impl Into<String>) -> Self {
        self.element_id = Some(element_id.into());
        self
    }

    pub fn with_replaces(mut self, replaces_id: impl Into<String>) -> Self {
        self.replaces_id = Some(replaces_id.into());
        self
    }

    pub fn with_element_type(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    /// Slot quantity; a missing or zero count means one.
    pub fn quantity(&self) -> u32 {
        self.count.filter(|count| *count > 0).unwrap_or(1)
    }

    pub fn is_equipped(&self) -> bool {
        self.equip_count.unwrap_or(0) > 0
    }
}

/// 1–2 references sharing one inventory slot: a base item, optionally
/// followed by one enchantment. Longer groups are rejected at synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeGroup {
    pub components: Vec<RawReference>,
}

impl CompositeGroup {
    pub fn new(components: Vec<RawReference>) -> Self {
        Self { components }
    }

    pub fn single(component: RawReference) -> Self {
        Self::new(vec![component])
    }

    pub fn with_enchantment(base: RawReference, enchantment: RawReference) -> Self {
        Self::new(vec![base, enchantment])
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// First component; quantity and equipped state come from it alone.
    pub fn base(&self) -> Option<&RawReference> {
        self.components.first()
    }
}
