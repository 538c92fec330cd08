//! Heuristic representation-type inference for extracted variables.

use crate::models::{RepresentationCatalog, RepresentationType, TypeQuery};

/// Lookup chain for numeric variables
pub const NUMERIC_CHAIN: [TypeQuery<'static>; 3] = [
    TypeQuery::Id("Decimal"),
    TypeQuery::Id("Float"),
    TypeQuery::Kind("decimal"),
];

/// Lookup chain for everything else
pub const TEXT_CHAIN: [TypeQuery<'static>; 2] = [TypeQuery::Id("String"), TypeQuery::Kind("string")];

/// Label fragments that mark a measured quantity
const NUMERIC_LABEL_HINTS: [&str; 4] = ["energy", "intensity", "count", "ev"];

/// Whether a variable looks numeric from its name and label.
///
/// The rules follow XAS naming habits: `i0`/`itrans` detector channels,
/// `mu*` absorption, `norm*` normalised spectra, `k`/`r`/`chi*` EXAFS
/// quantities.
pub fn is_numeric_variable(name: &str, label: &str) -> bool {
    let name = name.to_lowercase();
    let label = label.to_lowercase();

    NUMERIC_LABEL_HINTS.iter().any(|hint| label.contains(hint))
        || (name.starts_with('i') && (name.contains('0') || name.contains("trans")))
        || name.starts_with("mu")
        || name.starts_with("norm")
        || name == "k"
        || name == "r"
        || name.starts_with("chi")
}

/// Assigns representation types from an injected catalog.
#[derive(Debug, Clone, Default)]
pub struct TypeInferencer {
    catalog: RepresentationCatalog,
}

impl TypeInferencer {
    pub fn new(catalog: RepresentationCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RepresentationCatalog {
        &self.catalog
    }

    pub fn infer(&self, name: &str, label: &str) -> Option<RepresentationType> {
        let chain: &[TypeQuery<'_>] = if is_numeric_variable(name, label) {
            &NUMERIC_CHAIN
        } else {
            &TEXT_CHAIN
        };
        self.catalog.resolve(chain).cloned()
    }

    /// Type for a resource-map variable from its declared format.
    ///
    /// Dataverse reports `CHARACTER` for text columns and `NUMERIC` for
    /// everything it could parse as a number.
    pub fn from_format_type(&self, format_type: Option<&str>) -> Option<RepresentationType> {
        let is_text = format_type.is_some_and(|f| f.to_lowercase().contains("char"));
        let query = if is_text {
            TypeQuery::Id("String")
        } else {
            TypeQuery::Id("Decimal")
        };
        self.catalog.resolve(&[query]).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_rules() {
        assert!(is_numeric_variable("energy", "energy (eV)"));
        assert!(is_numeric_variable("i0", "i0"));
        assert!(is_numeric_variable("itrans", "itrans"));
        assert!(is_numeric_variable("mufluor", "mufluor"));
        assert!(is_numeric_variable("normtrans", "normtrans"));
        assert!(is_numeric_variable("K", "K"));
        assert!(is_numeric_variable("r", "r"));
        assert!(is_numeric_variable("chi_mag", "chi_mag"));
        assert!(is_numeric_variable("x", "Total counts"));
        assert!(is_numeric_variable("x", "photon intensity"));
    }

    #[test]
    fn test_text_rules() {
        assert!(!is_numeric_variable("sample", "sample"));
        assert!(!is_numeric_variable("index", "index"));
        assert!(!is_numeric_variable("kappa", "kappa"));
        assert!(!is_numeric_variable("region", "region"));
    }

    #[test]
    fn test_label_hint_ev_matches_inside_words() {
        // "level" contains "ev"; the rule is substring-based.
        assert!(is_numeric_variable("site", "water level"));
    }

    #[test]
    fn test_infer_uses_catalog() {
        let inferencer = TypeInferencer::default();
        assert_eq!(inferencer.infer("i0", "i0").unwrap().id, "Decimal");
        assert_eq!(inferencer.infer("name", "name").unwrap().id, "String");
    }

    #[test]
    fn test_from_format_type() {
        let inferencer = TypeInferencer::default();
        assert_eq!(
            inferencer.from_format_type(Some("CHARACTER")).unwrap().id,
            "String"
        );
        assert_eq!(inferencer.from_format_type(Some("NUMERIC")).unwrap().id, "Decimal");
        assert_eq!(inferencer.from_format_type(None).unwrap().id, "Decimal");
    }
}
