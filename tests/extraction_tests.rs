//! Column extraction tests

use cdi_metadata_sdk::import::assemble_offline;
use cdi_metadata_sdk::jsonld::{CandidateSource, ColumnExtractor, ExtractionCatalog};
use cdi_metadata_sdk::models::RepresentationCatalog;
use serde_json::{Value, json};

const SKOS_DEFINITION: &str = "http://www.w3.org/2004/02/skos/core#definition";

/// Document with a label index whose keys map to concept definitions.
fn labelled_document(entries: &[(&str, &str)]) -> Value {
    let mut index = serde_json::Map::new();
    index.insert("@id".to_string(), json!("https://ddi-cdi.org/label/Column"));
    let mut graph = Vec::new();
    for (i, (suffix, definition)) in entries.iter().enumerate() {
        let concept_id = format!("#concept-{}", i);
        index.insert(
            format!("https://ddi-cdi.org/label/{}", suffix),
            json!({"@id": concept_id}),
        );
        graph.push(json!({"@id": concept_id, SKOS_DEFINITION: definition}));
    }
    graph.insert(0, Value::Object(index));
    json!({"@graph": graph})
}

mod label_path_tests {
    use super::*;

    #[test]
    fn test_energy_and_i0_end_to_end() {
        let document = labelled_document(&[("2", "i0"), ("1", "energy (eV)")]);
        let dataset = assemble_offline(document, &ColumnExtractor::default()).unwrap();

        assert_eq!(dataset.columns.len(), 2);
        let energy = &dataset.columns[0];
        assert_eq!(energy.position, 0);
        assert_eq!(energy.name, "energy");
        assert_eq!(energy.label, "energy (eV)");
        assert_eq!(energy.description, "energy (eV)");
        assert_eq!(energy.type_id(), Some("Decimal"));
        assert!(!energy.coded);

        let i0 = &dataset.columns[1];
        assert_eq!(i0.position, 1);
        assert_eq!(i0.name, "i0");
        assert_eq!(i0.label, "i0");
        assert_eq!(i0.type_id(), Some("Decimal"));
    }

    #[test]
    fn test_order_follows_numeric_suffix() {
        let document = labelled_document(&[
            ("10", "angle"),
            ("2", "itrans"),
            ("1", "energy"),
            ("x", "comment text"),
        ]);
        let columns = ColumnExtractor::default().extract_columns(&document);
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        // "x" has no digits and sorts as 0
        assert_eq!(names, vec!["comment", "energy", "itrans", "angle"]);
        assert_eq!(
            columns.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_duplicate_names_keep_first_definition() {
        let document = labelled_document(&[("1", "energy (eV)"), ("2", "energy (keV)")]);
        let columns = ColumnExtractor::default().extract_columns(&document);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].label, "energy (eV)");
    }

    #[test]
    fn test_unresolvable_entries_are_skipped() {
        let document = json!({
            "@graph": [
                {
                    "@id": "https://ddi-cdi.org/label/Column",
                    "https://ddi-cdi.org/label/1": {"@id": "#missing"},
                    "https://ddi-cdi.org/label/2": "#plain",
                    "https://ddi-cdi.org/label/3": {"@id": "#empty"},
                    "https://ddi-cdi.org/label/4": 17
                },
                {"@id": "#plain", "definition": [{"@value": "mufluor"}]},
                {"@id": "#empty", "definition": ""}
            ]
        });
        let columns = ColumnExtractor::default().extract_columns(&document);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "mufluor");
        assert_eq!(columns[0].position, 0);
    }

    #[test]
    fn test_nodes_found_in_cdi_generated() {
        let document = json!({
            "@graph": [{"@id": "https://doi.org/10.5072/FK2/X", "@type": "schema:Dataset"}],
            "CDIGenerated": [
                {
                    "@id": "https://ddi-cdi.org/label/Column",
                    "https://ddi-cdi.org/label/1": {"@id": "#c"}
                },
                {"@id": "#c", "http://schema.org/definition": "Temperature in the hutch"}
            ]
        });
        let columns = ColumnExtractor::default().extract_columns(&document);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "Temperature");
        assert_eq!(columns[0].label, "Temperature in the hutch");
        assert_eq!(columns[0].type_id(), Some("String"));
    }

    #[test]
    fn test_custom_representation_catalog_falls_back_to_first() {
        let types = RepresentationCatalog::new(vec![
            cdi_metadata_sdk::models::RepresentationType::new("Text", "text", "Text"),
        ]);
        let extractor = ColumnExtractor::new(ExtractionCatalog::default(), types);
        let columns = extractor.extract_columns(&labelled_document(&[("1", "energy")]));
        assert_eq!(columns[0].type_id(), Some("Text"));
    }
}

mod xdi_path_tests {
    use super::*;

    fn with_mapping(mut document: Value, names: &[&str]) -> Value {
        let items: Vec<Value> = names.iter().map(|n| json!({"xdi dictionary": n})).collect();
        document["xdiCdifMapping"] = json!({"@graph": items});
        document
    }

    #[test]
    fn test_no_label_root_yields_no_columns() {
        let document = with_mapping(json!({"@graph": []}), &["energy", "i0"]);
        let extractor = ColumnExtractor::default();

        let candidates = extractor.extract_candidates(&document);
        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.source == CandidateSource::Xdi));

        assert!(extractor.extract_columns(&document).is_empty());
    }

    #[test]
    fn test_xdi_candidates_never_reach_output() {
        let document = with_mapping(
            labelled_document(&[("1", "energy (eV)")]),
            &["zeta", "i0", "Beamline", "Mono.name", "energy", ""],
        );
        let extractor = ColumnExtractor::default();

        let candidates = extractor.extract_candidates(&document);
        let summary: Vec<(&str, usize, CandidateSource)> = candidates
            .iter()
            .map(|c| (c.name.as_str(), c.position, c.source))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("energy", 0, CandidateSource::Label),
                ("i0", 1, CandidateSource::Xdi),
                ("zeta", 2, CandidateSource::Xdi),
            ]
        );

        let columns = extractor.extract_columns(&document);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].name, "energy");
    }

    #[test]
    fn test_configured_catalog_changes_ranking() {
        let catalog = ExtractionCatalog {
            priority_variables: vec!["zeta".to_string()],
            structural_names: vec![],
        };
        let extractor = ColumnExtractor::new(catalog, RepresentationCatalog::default());
        let document = with_mapping(json!({}), &["alpha", "Beamline", "zeta"]);
        let names: Vec<String> = extractor
            .extract_candidates(&document)
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["zeta", "Beamline", "alpha"]);
    }
}

#[test]
fn test_document_is_not_mutated() {
    let document = labelled_document(&[("1", "energy (eV)")]);
    let before = document.clone();
    let _ = ColumnExtractor::default().extract_columns(&document);
    assert_eq!(document, before);
}
