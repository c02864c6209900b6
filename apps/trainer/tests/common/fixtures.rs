//! Word lists used by integration tests.

/// Three known categories and one unknown one.
pub const WORD_LIST: &str = "\
# Top 100 High-Frequency Words
the|el/la|article|El perro es grande.
to be|ser/estar|verb|Quiero ser doctor.

# Food, Dining, & Travel
apple|manzana|noun|Me gusta la manzana roja.

# Odds and Ends
umbrella|paraguas|noun|Llevo el paraguas.
";

pub const WORD_COUNT: usize = 4;
