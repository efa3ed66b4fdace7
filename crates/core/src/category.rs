//! Category domain types.
//!
//! A [`CategorySet`] is the per-user budget definition: named categories with
//! relative weights. Definition order is part of the value. It decides which
//! category absorbs the rounding remainder when a total is split, so the set
//! is an explicit ordered sequence rather than a hash map.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque identifier of a conversational participant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single named category and its relative weight.
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub name: String,
    pub weight: f64,
}

/// An ordered set of uniquely named categories.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySet {
    entries: Vec<Category>,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category, or update its weight in place if the name exists.
    ///
    /// Updating keeps the original position, so the first definition of a
    /// name decides its order.
    pub fn insert(&mut self, name: impl Into<String>, weight: f64) {
        let name = name.into();
        match self.entries.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.weight = weight,
            None => self.entries.push(Category { name, weight }),
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.weight)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The category that absorbs the rounding remainder.
    pub fn first(&self) -> Option<&Category> {
        self.entries.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.name.as_str())
    }

    /// The first category whose weight is NaN or infinite, if any.
    pub fn non_finite(&self) -> Option<&Category> {
        self.entries.iter().find(|c| !c.weight.is_finite())
    }

    /// Sum of all weights.
    pub fn total_weight(&self) -> f64 {
        self.entries.iter().map(|c| c.weight).sum()
    }
}

impl<N: Into<String>> FromIterator<(N, f64)> for CategorySet {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        let mut set = CategorySet::new();
        for (name, weight) in iter {
            set.insert(name, weight);
        }
        set
    }
}

impl<'a> IntoIterator for &'a CategorySet {
    type Item = &'a Category;
    type IntoIter = std::slice::Iter<'a, Category>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for CategorySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for category in &self.entries {
            map.serialize_entry(&category.name, &category.weight)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategorySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategorySetVisitor)
    }
}

/// Reads a `name -> number` mapping in document order.
struct CategorySetVisitor;

impl<'de> Visitor<'de> for CategorySetVisitor {
    type Value = CategorySet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of category names to numeric weights")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut set = CategorySet::new();
        while let Some((name, weight)) = access.next_entry::<String, f64>()? {
            if name.is_empty() {
                return Err(serde::de::Error::custom("category name must not be empty"));
            }
            if !weight.is_finite() {
                return Err(serde::de::Error::custom(format!(
                    "weight of category {name:?} must be a finite number"
                )));
            }
            set.insert(name, weight);
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_keeps_first_position() {
        let mut set = CategorySet::new();
        set.insert("Food", 50.0);
        set.insert("Rent", 30.0);
        set.insert("Food", 10.0);

        assert_eq!(set.len(), 2);
        assert_eq!(set.first().unwrap().name, "Food");
        assert_eq!(set.get("Food"), Some(10.0));
    }

    #[test]
    fn names_are_case_sensitive() {
        let set: CategorySet = [("food", 1.0), ("Food", 2.0)].into_iter().collect();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get("food"), Some(1.0));
        assert_eq!(set.get("FOOD"), None);
    }

    #[test]
    fn total_weight_sums_all() {
        let set: CategorySet = [("A", 1.5), ("B", 0.0), ("C", 2.5)].into_iter().collect();
        assert_eq!(set.total_weight(), 4.0);
    }

    #[test]
    fn json_preserves_document_order() {
        let set: CategorySet =
            serde_json::from_str(r#"{"Rent": 30, "Food": 50, "Other": 20}"#).unwrap();
        let names: Vec<&str> = set.names().collect();
        assert_eq!(names, vec!["Rent", "Food", "Other"]);

        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"Rent":30.0,"Food":50.0,"Other":20.0}"#);
    }

    #[test]
    fn yaml_integer_weights_are_accepted() {
        let set: CategorySet = serde_yaml::from_str("Food: 50\nRent: 30.5\n").unwrap();
        assert_eq!(set.get("Food"), Some(50.0));
        assert_eq!(set.get("Rent"), Some(30.5));
    }

    #[test]
    fn non_numeric_weight_is_rejected() {
        assert!(serde_json::from_str::<CategorySet>(r#"{"Food": "lots"}"#).is_err());
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        assert!(serde_yaml::from_str::<CategorySet>("Food: .nan\nRent: 1").is_err());
        assert!(serde_yaml::from_str::<CategorySet>("Food: .inf").is_err());
        assert!(serde_yaml::from_str::<CategorySet>("Food: -.inf").is_err());
        assert!(serde_json::from_str::<CategorySet>(r#"{"Food": 1e999}"#).is_err());
    }

    #[test]
    fn non_finite_reports_first_offender() {
        let set: CategorySet = [("Food", 1.0), ("Fun", f64::NAN), ("Rent", f64::INFINITY)]
            .into_iter()
            .collect();
        assert_eq!(set.non_finite().map(|c| c.name.as_str()), Some("Fun"));

        let ok: CategorySet = [("Food", 1.0)].into_iter().collect();
        assert!(ok.non_finite().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(serde_json::from_str::<CategorySet>(r#"{"": 5}"#).is_err());
    }

    #[test]
    fn non_mapping_is_rejected() {
        assert!(serde_json::from_str::<CategorySet>("[1, 2]").is_err());
        assert!(serde_json::from_str::<CategorySet>("100").is_err());
    }

    #[test]
    fn user_id_from_telegram_id() {
        let id = UserId::from(123456789_i64);
        assert_eq!(id.as_str(), "123456789");
        assert_eq!(id.to_string(), "123456789");
    }
}
