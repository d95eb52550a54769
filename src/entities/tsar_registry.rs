// 👑 Tsar Registry - fixed sample lineage for comparison checks

use super::person::Person;

pub struct TsarRegistry;

impl TsarRegistry {
    /// Ivan IV with his father Vasili III as parent. Every call creates new
    /// records, so ids differ between calls while values stay the same.
    pub fn current_tsar() -> Person {
        Person::new(
            "Ivan IV The Terrible",
            54,
            170,
            70,
            Some(Person::new("Vasili III of Russia", 28, 170, 60, None)),
        )
    }
}
