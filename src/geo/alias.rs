//! Region name normalization.
//!
//! The boundary file labels polygons with short local names
//! ("Andijon", "Buxoro") while the observation table uses canonical
//! English names ("Andijan region", "Bukhara region"). This table
//! reconciles the two so map joins line up. It is fixed at compile
//! time; unmapped names pass through unchanged.

/// Short boundary-file name -> canonical region name.
///
/// Karakalpakstan appears under two spellings in the wild, so both
/// map to the same canonical name.
pub const REGION_ALIASES: &[(&str, &str)] = &[
    ("Andijon", "Andijan region"),
    ("Buxoro", "Bukhara region"),
    ("Farg'ona", "Fergana region"),
    ("Jizzax", "Jizzakh region"),
    ("Namangan", "Namangan region"),
    ("Navoiy", "Navoi region"),
    ("Qashqadaryo", "Kashkadarya region"),
    ("Qoraqalpog'iston", "Republic of Karakalpakstan"),
    ("Qaraqalpaqstan", "Republic of Karakalpakstan"),
    ("Samarqand", "Samarkand region"),
    ("Sirdaryo", "Syrdarya region"),
    ("Surxondaryo", "Surkhandarya region"),
    ("Toshkent", "Tashkent region"),
    ("ToshkentShahri", "Tashkent city"),
    ("Xorazm", "Khorezm region"),
];

/// Resolve a region name to its canonical form.
///
/// Names without an alias are returned as-is; they simply fail to
/// join and leave their polygon unfilled.
pub fn canonical_region(name: &str) -> &str {
    REGION_ALIASES
        .iter()
        .find(|(short, _)| *short == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}
