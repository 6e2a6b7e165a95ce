use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Number of generated genotype identifiers (`G0001` through `G5000`).
pub const GENOTYPE_COUNT: u16 = 5000;

/// A genotype identifier from the dense `G0001..=G5000` sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GenotypeId(u16);

impl GenotypeId {
    pub const FIRST: GenotypeId = GenotypeId(1);
    pub const LAST: GenotypeId = GenotypeId(GENOTYPE_COUNT);

    pub fn new(index: u16) -> Option<Self> {
        (1..=GENOTYPE_COUNT).contains(&index).then_some(Self(index))
    }

    pub fn index(self) -> u16 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = GenotypeId> {
        (1..=GENOTYPE_COUNT).map(GenotypeId)
    }
}

impl Default for GenotypeId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for GenotypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "G{:04}", self.0)
    }
}

impl FromStr for GenotypeId {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('G')
            .filter(|digits| digits.len() == 4 && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u16>().ok())
            .and_then(Self::new)
            .ok_or_else(|| FieldError::invalid_value(Field::GenotypeId, s))
    }
}

impl TryFrom<String> for GenotypeId {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GenotypeId> for String {
    fn from(value: GenotypeId) -> Self {
        value.to_string()
    }
}

// Closed option sets. The first listed variant is the form default.
macro_rules! categorical_enum {
    ($(#[$meta:meta])* $name:ident for $field:path { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::ALL[0]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = FieldError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(FieldError::invalid_value($field, other)),
                }
            }
        }
    };
}

categorical_enum!(
    /// Allele observed at marker A.
    MarkerA for Field::MarkerA {
        Thymine => "T",
        Cytosine => "C",
    }
);

categorical_enum!(
    /// Presence of resistance gene R1.
    GeneR1 for Field::GeneR1 {
        Present => "P",
        Absent => "A",
    }
);

categorical_enum!(
    /// Allele at the fruit-size QTL.
    QtlFruitSize for Field::QtlFruitSize {
        A1 => "A1",
        A2 => "A2",
    }
);

categorical_enum!(
    Location for Field::Location {
        Badlapur => "Badlapur",
        Nagpur => "Nagpur",
    }
);

categorical_enum!(
    IrrigationLevel for Field::IrrigationLevel {
        Optimal => "Optimal",
        Stressed => "Stressed",
    }
);

/// One of the six slots of a [`FieldSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    GenotypeId,
    MarkerA,
    GeneR1,
    QtlFruitSize,
    Location,
    IrrigationLevel,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::GenotypeId,
        Field::MarkerA,
        Field::GeneR1,
        Field::QtlFruitSize,
        Field::Location,
        Field::IrrigationLevel,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Field::GenotypeId => "genotypeId",
            Field::MarkerA => "markerA",
            Field::GeneR1 => "geneR1",
            Field::QtlFruitSize => "qtlFruitSize",
            Field::Location => "location",
            Field::IrrigationLevel => "irrigationLevel",
        }
    }

    /// Key used for this field in the prediction service request body.
    pub fn wire_key(self) -> &'static str {
        match self {
            Field::GenotypeId => "Genotype_ID",
            Field::MarkerA => "Marker_A (T/C)",
            Field::GeneR1 => "Gene_R1 (P/A)",
            Field::QtlFruitSize => "QTL_Fruit_Size (A1/A2)",
            Field::Location => "Location",
            Field::IrrigationLevel => "Irrigation_Level",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::GenotypeId => "Genotype ID",
            Field::MarkerA => "Marker A (T/C)",
            Field::GeneR1 => "Gene R1 (P/A)",
            Field::QtlFruitSize => "QTL Fruit Size",
            Field::Location => "Location",
            Field::IrrigationLevel => "Irrigation Level",
        }
    }

    /// Every value the field accepts, in presentation order.
    pub fn options(self) -> Vec<String> {
        fn strings<T: fmt::Display>(values: &[T]) -> Vec<String> {
            values.iter().map(ToString::to_string).collect()
        }

        match self {
            Field::GenotypeId => GenotypeId::all().map(String::from).collect(),
            Field::MarkerA => strings(MarkerA::ALL),
            Field::GeneR1 => strings(GeneR1::ALL),
            Field::QtlFruitSize => strings(QtlFruitSize::ALL),
            Field::Location => strings(Location::ALL),
            Field::IrrigationLevel => strings(IrrigationLevel::ALL),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    /// Accepts either the camel-case name (case-insensitive) or the exact wire key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|field| s == field.wire_key() || s.eq_ignore_ascii_case(field.name()))
            .ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

/// Complete set of categorical inputs for one prediction request.
///
/// Serializes directly into the prediction service request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FieldSet {
    #[serde(rename = "Genotype_ID")]
    pub genotype_id: GenotypeId,
    #[serde(rename = "Marker_A (T/C)")]
    pub marker_a: MarkerA,
    #[serde(rename = "Gene_R1 (P/A)")]
    pub gene_r1: GeneR1,
    #[serde(rename = "QTL_Fruit_Size (A1/A2)")]
    pub qtl_fruit_size: QtlFruitSize,
    #[serde(rename = "Location")]
    pub location: Location,
    #[serde(rename = "Irrigation_Level")]
    pub irrigation_level: IrrigationLevel,
}

impl FieldSet {
    /// Returns a copy with `field` replaced by the parsed `value`.
    ///
    /// `self` is untouched when `value` is outside the field's options.
    pub fn with_value(self, field: Field, value: &str) -> Result<Self, FieldError> {
        let mut next = self;
        match field {
            Field::GenotypeId => next.genotype_id = value.parse()?,
            Field::MarkerA => next.marker_a = value.parse()?,
            Field::GeneR1 => next.gene_r1 = value.parse()?,
            Field::QtlFruitSize => next.qtl_fruit_size = value.parse()?,
            Field::Location => next.location = value.parse()?,
            Field::IrrigationLevel => next.irrigation_level = value.parse()?,
        }
        Ok(next)
    }

    pub fn value(&self, field: Field) -> String {
        match field {
            Field::GenotypeId => self.genotype_id.to_string(),
            Field::MarkerA => self.marker_a.to_string(),
            Field::GeneR1 => self.gene_r1.to_string(),
            Field::QtlFruitSize => self.qtl_fruit_size.to_string(),
            Field::Location => self.location.to_string(),
            Field::IrrigationLevel => self.irrigation_level.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
