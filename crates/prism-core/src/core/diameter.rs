use crate::core::table::{TableError, ValueTable};

/// Site diameters. The pair contact distance consumed by hard-core-aware
/// closures is the arithmetic mean `sigma(a, b) = (d_a + d_b) / 2`.
#[derive(Debug, Clone)]
pub struct Diameter {
    values: ValueTable<f64>,
}

impl Diameter {
    pub fn new(types: &[String]) -> Self {
        Self {
            values: ValueTable::new(types, "diameter"),
        }
    }

    pub fn set(&mut self, label: &str, diameter: f64) -> Result<(), TableError> {
        self.values.set(label, diameter)
    }

    pub fn set_all(&mut self, diameter: f64) {
        self.values.set_all(diameter);
    }

    pub fn get(&self, label: &str) -> Result<Option<f64>, TableError> {
        Ok(self.values.get(label)?.copied())
    }

    pub fn get_by_index(&self, index: usize) -> Option<f64> {
        self.values.get_by_index(index).copied()
    }

    pub fn sigma(&self, type1: &str, type2: &str) -> Result<Option<f64>, TableError> {
        let d1 = self.get(type1)?;
        let d2 = self.get(type2)?;
        Ok(match (d1, d2) {
            (Some(d1), Some(d2)) => Some((d1 + d2) / 2.0),
            _ => None,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, Option<&f64>)> {
        self.values.iter()
    }

    pub fn check(&self) -> Result<(), TableError> {
        self.values.check()
    }
}

#[cfg(test)]
mod tests {
    use super::Diameter;

    #[test]
    fn sigma_is_the_mean_of_the_two_diameters() {
        let types = vec!["A".to_string(), "B".to_string()];
        let mut diameter = Diameter::new(&types);
        diameter.set("A", 1.0).expect("set");
        diameter.set("B", 2.0).expect("set");

        assert_eq!(diameter.sigma("A", "B").expect("known"), Some(1.5));
        assert_eq!(diameter.sigma("A", "A").expect("known"), Some(1.0));
    }

    #[test]
    fn sigma_is_unset_until_both_diameters_exist() {
        let types = vec!["A".to_string(), "B".to_string()];
        let mut diameter = Diameter::new(&types);
        diameter.set("A", 1.0).expect("set");
        assert_eq!(diameter.sigma("A", "B").expect("known"), None);

        diameter.set_all(3.0);
        assert_eq!(diameter.sigma("A", "B").expect("known"), Some(3.0));
    }
}
