#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    #[error("table '{table}' has no type '{label}'")]
    UnknownType { table: String, label: String },
    #[error("table '{table}' is not fully specified: '{entry}' is unset")]
    NotFullySpecified { table: String, entry: String },
}

/// One value per site type, keyed by label. Entries start unset and must all
/// be populated before a system assembles.
#[derive(Debug, Clone)]
pub struct ValueTable<T> {
    name: String,
    types: Vec<String>,
    values: Vec<Option<T>>,
}

impl<T> ValueTable<T> {
    pub fn new(types: &[String], name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: types.to_vec(),
            values: types.iter().map(|_| None).collect(),
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    fn index_of(&self, label: &str) -> Result<usize, TableError> {
        self.types
            .iter()
            .position(|known| known == label)
            .ok_or_else(|| TableError::UnknownType {
                table: self.name.clone(),
                label: label.to_string(),
            })
    }

    pub fn set(&mut self, label: &str, value: T) -> Result<(), TableError> {
        let index = self.index_of(label)?;
        self.values[index] = Some(value);
        Ok(())
    }

    pub fn get(&self, label: &str) -> Result<Option<&T>, TableError> {
        let index = self.index_of(label)?;
        Ok(self.values[index].as_ref())
    }

    pub fn get_by_index(&self, index: usize) -> Option<&T> {
        self.values[index].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, Option<&T>)> {
        self.types
            .iter()
            .enumerate()
            .map(|(index, label)| (index, label.as_str(), self.values[index].as_ref()))
    }

    pub fn check(&self) -> Result<(), TableError> {
        for (_, label, value) in self.iter() {
            if value.is_none() {
                return Err(TableError::NotFullySpecified {
                    table: self.name.clone(),
                    entry: label.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<T: Clone> ValueTable<T> {
    /// Assign the same value to every type.
    pub fn set_all(&mut self, value: T) {
        for slot in &mut self.values {
            *slot = Some(value.clone());
        }
    }
}

/// One value per unordered site-type pair. Storage covers the upper triangle
/// only, so the table is symmetric by construction.
#[derive(Debug, Clone)]
pub struct PairTable<T> {
    name: String,
    types: Vec<String>,
    values: Vec<Option<T>>,
}

impl<T> PairTable<T> {
    pub fn new(types: &[String], name: impl Into<String>) -> Self {
        let rank = types.len();
        Self {
            name: name.into(),
            types: types.to_vec(),
            values: (0..rank * (rank + 1) / 2).map(|_| None).collect(),
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn rank(&self) -> usize {
        self.types.len()
    }

    fn index_of(&self, label: &str) -> Result<usize, TableError> {
        self.types
            .iter()
            .position(|known| known == label)
            .ok_or_else(|| TableError::UnknownType {
                table: self.name.clone(),
                label: label.to_string(),
            })
    }

    fn triangle_index(&self, site1: usize, site2: usize) -> usize {
        let (low, high) = if site1 <= site2 {
            (site1, site2)
        } else {
            (site2, site1)
        };
        // row-major upper triangle offset for row `low`
        low * self.rank() - low * (low + 1) / 2 + high
    }

    pub fn set(&mut self, type1: &str, type2: &str, value: T) -> Result<(), TableError> {
        let site1 = self.index_of(type1)?;
        let site2 = self.index_of(type2)?;
        let index = self.triangle_index(site1, site2);
        self.values[index] = Some(value);
        Ok(())
    }

    pub fn get(&self, type1: &str, type2: &str) -> Result<Option<&T>, TableError> {
        let site1 = self.index_of(type1)?;
        let site2 = self.index_of(type2)?;
        Ok(self.values[self.triangle_index(site1, site2)].as_ref())
    }

    pub fn get_by_indices(&self, site1: usize, site2: usize) -> Option<&T> {
        self.values[self.triangle_index(site1, site2)].as_ref()
    }

    /// Iterate the independent (upper-triangle) pairs in row-major order.
    pub fn iter_pairs(&self) -> impl Iterator<Item = (usize, usize, &str, &str, Option<&T>)> {
        let rank = self.rank();
        (0..rank).flat_map(move |site1| {
            (site1..rank).map(move |site2| {
                (
                    site1,
                    site2,
                    self.types[site1].as_str(),
                    self.types[site2].as_str(),
                    self.values[self.triangle_index(site1, site2)].as_ref(),
                )
            })
        })
    }

    pub fn check(&self) -> Result<(), TableError> {
        for (_, _, type1, type2, value) in self.iter_pairs() {
            if value.is_none() {
                return Err(TableError::NotFullySpecified {
                    table: self.name.clone(),
                    entry: format!("{type1}-{type2}"),
                });
            }
        }
        Ok(())
    }

    /// Populate every still-unset pair from a factory.
    pub fn set_unset_with(&mut self, factory: impl Fn() -> T) {
        for slot in &mut self.values {
            if slot.is_none() {
                *slot = Some(factory());
            }
        }
    }

    /// Populate every pair from a factory, replacing existing entries.
    pub fn set_all_with(&mut self, factory: impl Fn() -> T) {
        for slot in &mut self.values {
            *slot = Some(factory());
        }
    }
}
