//! Tabular summaries of an analyzed schema for display.

use relnf_core::NormalForm;
use tabled::builder::Builder;
use tabled::Table;

use crate::schema::Schema;

const TIERS: [NormalForm; 4] =
    [NormalForm::First, NormalForm::Second, NormalForm::Third, NormalForm::BoyceCodd];

/// One row per dependency, with a Y/N column for each tier it satisfies.
pub fn normal_form_table(schema: &Schema) -> Table {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("Functional Dependency".to_string())
            .chain(TIERS.iter().map(ToString::to_string)),
    );
    for fd in schema.fds() {
        builder.push_record(std::iter::once(fd.to_string()).chain(
            TIERS.iter().map(|&tier| if fd.normal_form() >= tier { "Y" } else { "N" }.to_string()),
        ));
    }
    builder.build()
}

/// One row per non-empty attribute subset, showing its closure.
pub fn closure_table(schema: &Schema) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Attribute Set", "Closure"]);
    for closure in schema.closures() {
        builder.push_record([closure.seed().to_string(), closure.set().to_string()]);
    }
    builder.build()
}

/// Name, attributes, candidate keys and normal form for each schema; useful
/// for rendering the outcome of a decomposition step.
pub fn schema_table<'a>(schemas: impl IntoIterator<Item = &'a Schema>) -> Table {
    let mut builder = Builder::default();
    builder.push_record(["Relation", "Candidate Keys", "Normal Form"]);
    for schema in schemas {
        let keys = schema
            .candidate_keys()
            .iter()
            .map(|k| format!("{{{k}}}"))
            .collect::<Vec<_>>()
            .join(", ");
        builder.push_record([schema.to_string(), keys, schema.normal_form().to_string()]);
    }
    builder.build()
}
