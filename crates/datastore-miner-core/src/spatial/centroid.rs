use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{MinerError, MinerResult};

/// Opaque identifier of a spatial unit, unique within a geography.
pub type AreaKey = String;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub key: AreaKey,
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(key: impl Into<AreaKey>, x: f64, y: f64) -> Self {
        Self {
            key: key.into(),
            x,
            y,
        }
    }

    #[inline]
    pub fn coords(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

/// Ordered, immutable list of area centroids with a key lookup.
#[derive(Debug, Clone, Default)]
pub struct CentroidSet {
    centroids: Vec<Centroid>,
    index: HashMap<AreaKey, usize>,
}

impl CentroidSet {
    /// Build from centroids in their canonical order.
    ///
    /// # Errors
    ///
    /// `DuplicateArea` if a key appears twice.
    pub fn new(centroids: Vec<Centroid>) -> MinerResult<Self> {
        let mut index = HashMap::with_capacity(centroids.len());
        for (i, c) in centroids.iter().enumerate() {
            if index.insert(c.key.clone(), i).is_some() {
                return Err(MinerError::DuplicateArea(c.key.clone()));
            }
        }
        Ok(Self { centroids, index })
    }

    pub fn from_points(points: Vec<(AreaKey, f64, f64)>) -> MinerResult<Self> {
        Self::new(
            points
                .into_iter()
                .map(|(key, x, y)| Centroid { key, x, y })
                .collect(),
        )
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn get(&self, i: usize) -> Option<&Centroid> {
        self.centroids.get(i)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Centroid> {
        self.centroids.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.centroids.iter().map(|c| c.key.as_str())
    }

    /// Coordinates in area order.
    pub fn coords(&self) -> Vec<[f64; 2]> {
        self.centroids.iter().map(Centroid::coords).collect()
    }
}

/// One numeric column keyed by area. Missing areas are allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariableVector {
    name: String,
    values: BTreeMap<AreaKey, f64>,
}

impl VariableVector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Later duplicates overwrite earlier ones.
    pub fn from_pairs<K, I>(name: impl Into<String>, pairs: I) -> Self
    where
        K: Into<AreaKey>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut v = Self::new(name);
        for (k, value) in pairs {
            v.insert(k, value);
        }
        v
    }

    pub fn insert(&mut self, key: impl Into<AreaKey>, value: f64) {
        self.values.insert(key.into(), value);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Full-length array in centroid order.
    ///
    /// # Errors
    ///
    /// `MissingArea` for the first centroid with no value.
    pub fn align(&self, centroids: &CentroidSet) -> MinerResult<Vec<f64>> {
        centroids
            .keys()
            .map(|key| {
                self.get(key)
                    .ok_or_else(|| MinerError::missing_area(&self.name, key))
            })
            .collect()
    }
}

/// Two variables restricted to the areas they share, in centroid order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinedColumns {
    pub keys: Vec<AreaKey>,
    /// Position of each joined area in the centroid set.
    pub indices: Vec<usize>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub coords: Vec<[f64; 2]>,
}

impl JoinedColumns {
    /// Wrap two columns already aligned to the full centroid order.
    pub fn from_aligned(x: Vec<f64>, y: Vec<f64>, centroids: &CentroidSet) -> MinerResult<Self> {
        if x.len() != centroids.len() {
            return Err(MinerError::length_mismatch("x", centroids.len(), x.len()));
        }
        if y.len() != centroids.len() {
            return Err(MinerError::length_mismatch("y", centroids.len(), y.len()));
        }
        Ok(Self {
            keys: centroids.keys().map(str::to_owned).collect(),
            indices: (0..centroids.len()).collect(),
            x,
            y,
            coords: centroids.coords(),
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.x.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// True when every area of an `n`-area geography is present, in order.
    pub fn covers(&self, n: usize) -> bool {
        self.indices.len() == n && self.indices.iter().enumerate().all(|(i, &idx)| i == idx)
    }
}

/// Inner join of `x` and `y` over the centroid order.
///
/// Areas missing from either variable, or from the centroid set, are dropped.
pub fn inner_join(x: &VariableVector, y: &VariableVector, centroids: &CentroidSet) -> JoinedColumns {
    let mut joined = JoinedColumns::default();
    for (i, c) in centroids.iter().enumerate() {
        if let (Some(vx), Some(vy)) = (x.get(&c.key), y.get(&c.key)) {
            joined.keys.push(c.key.clone());
            joined.indices.push(i);
            joined.x.push(vx);
            joined.y.push(vy);
            joined.coords.push(c.coords());
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> CentroidSet {
        CentroidSet::from_points(vec![
            ("A".to_string(), 0.0, 0.0),
            ("B".to_string(), 0.0, 0.0),
            ("C".to_string(), 10.0, 0.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = CentroidSet::from_points(vec![
            ("A".to_string(), 0.0, 0.0),
            ("A".to_string(), 1.0, 1.0),
        ])
        .unwrap_err();
        assert!(matches!(err, MinerError::DuplicateArea(k) if k == "A"));
    }

    #[test]
    fn test_index_lookup() {
        let set = abc();
        assert_eq!(set.len(), 3);
        assert_eq!(set.index_of("C"), Some(2));
        assert_eq!(set.index_of("Z"), None);
        assert_eq!(set.coords()[2], [10.0, 0.0]);
    }

    #[test]
    fn test_inner_join_keeps_centroid_order() {
        let set = abc();
        let x = VariableVector::from_pairs("x", [("C", 3.0), ("A", 1.0), ("Q", 9.0)]);
        let y = VariableVector::from_pairs("y", [("A", 5.0), ("B", 6.0), ("C", 7.0)]);
        let joined = inner_join(&x, &y, &set);
        assert_eq!(joined.keys, vec!["A".to_string(), "C".to_string()]);
        assert_eq!(joined.indices, vec![0, 2]);
        assert_eq!(joined.x, vec![1.0, 3.0]);
        assert_eq!(joined.y, vec![5.0, 7.0]);
        assert!(!joined.covers(3));
    }

    #[test]
    fn test_align_reports_missing_area() {
        let set = abc();
        let x = VariableVector::from_pairs("pop", [("A", 1.0), ("C", 3.0)]);
        let err = x.align(&set).unwrap_err();
        assert!(matches!(err, MinerError::MissingArea { ref area, .. } if area == "B"));

        let full = VariableVector::from_pairs("pop", [("A", 1.0), ("B", 2.0), ("C", 3.0)]);
        assert_eq!(full.align(&set).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_from_aligned_checks_lengths() {
        let set = abc();
        let joined = JoinedColumns::from_aligned(vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0], &set)
            .unwrap();
        assert!(joined.covers(3));
        assert!(JoinedColumns::from_aligned(vec![1.0], vec![1.0, 2.0, 3.0], &set).is_err());
    }
}
