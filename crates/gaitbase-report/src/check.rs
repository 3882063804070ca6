//! Compare a text template against the field schema.

use std::collections::BTreeSet;

use gaitbase_core::schema::FieldSchema;

use crate::template::TextTemplate;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateCheck {
    /// Record fields the template uses.
    pub referenced: BTreeSet<String>,
    /// Names the template uses that the schema does not define. Rendering
    /// would fail on these.
    pub unrecognized: BTreeSet<String>,
    /// Schema fields the template never mentions.
    pub unreferenced: BTreeSet<String>,
}

impl TemplateCheck {
    pub fn is_ok(&self) -> bool {
        self.unrecognized.is_empty()
    }
}

pub fn check_template(template: &TextTemplate, schema: &FieldSchema) -> TemplateCheck {
    let known: BTreeSet<String> = schema
        .report_names()
        .into_iter()
        .map(str::to_string)
        .collect();
    let referenced = template.referenced_fields();

    TemplateCheck {
        unrecognized: referenced.difference(&known).cloned().collect(),
        unreferenced: known.difference(&referenced).cloned().collect(),
        referenced,
    }
}
