//! Report commands: load a record, resolve its fields and hand them to the
//! renderers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use eyre::WrapErr;

use gaitbase_core::models::patient::Patient;
use gaitbase_core::models::record::Record;
use gaitbase_core::resolve::{ResolvedFields, resolve_fields};
use gaitbase_core::schema::FieldSchema;
use gaitbase_report::check::{TemplateCheck, check_template};
use gaitbase_report::docx::generate_docx;
use gaitbase_report::sheet::{render_spreadsheet, save_spreadsheet};
use gaitbase_report::template::TextTemplate;
use gaitbase_report::text::{TextOptions, render_text_file};

use crate::config::GaitbaseConfig;

/// Pick the path given on the command line, else the configured one.
pub fn choose_path(
    given: Option<&Path>,
    configured: Option<&Path>,
    what: &str,
) -> eyre::Result<PathBuf> {
    given
        .or(configured)
        .map(Path::to_path_buf)
        .ok_or_else(|| eyre::eyre!("no {what} given and none set in the config"))
}

pub fn load_schema(path: &Path) -> eyre::Result<FieldSchema> {
    FieldSchema::load(path).wrap_err_with(|| format!("loading field schema {}", path.display()))
}

/// Load the record at `record_path` and resolve it against `schema`.
pub fn load_record(
    schema: &FieldSchema,
    record_path: &Path,
) -> eyre::Result<(Record, ResolvedFields)> {
    let record = Record::load(record_path)
        .wrap_err_with(|| format!("loading record {}", record_path.display()))?;
    let fields = resolve_fields(schema, &record)
        .wrap_err_with(|| format!("resolving record {}", record_path.display()))?;
    Ok((record, fields))
}

/// Values the text report sees: with unit suffixes when configured.
pub fn text_values(config: &GaitbaseConfig, fields: &ResolvedFields) -> BTreeMap<String, String> {
    if config.include_units {
        fields.with_units()
    } else {
        fields.values.clone()
    }
}

pub fn text_report(
    config: &GaitbaseConfig,
    template: &Path,
    fields: &ResolvedFields,
) -> eyre::Result<String> {
    let options = TextOptions {
        rewrite: config.text_replace.clone(),
    };
    let values = text_values(config, fields);
    let report = render_text_file(template, &values, &fields.defaults, &options)
        .wrap_err_with(|| format!("rendering text template {}", template.display()))?;
    Ok(report)
}

pub fn sheet_report(
    config: &GaitbaseConfig,
    template: &Path,
    fields: &ResolvedFields,
    output: &Path,
) -> eyre::Result<()> {
    let book = render_spreadsheet(
        template,
        &fields.values,
        &fields.defaults,
        &config.sheet_replace,
    )
    .wrap_err_with(|| format!("rendering spreadsheet template {}", template.display()))?;
    save_spreadsheet(&book, output)?;
    Ok(())
}

pub fn docx_report(
    config: &GaitbaseConfig,
    template: &Path,
    fields: &ResolvedFields,
    output: &Path,
) -> eyre::Result<()> {
    let report = text_report(config, template, fields)?;
    let bytes = generate_docx(&report, &config.docx)?;

    let tmp_path = output.with_extension("docx.tmp");
    std::fs::write(&tmp_path, &bytes)
        .wrap_err_with(|| format!("writing {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, output)
        .wrap_err_with(|| format!("writing {}", output.display()))?;

    tracing::info!(path = %output.display(), bytes = bytes.len(), "docx report written");
    Ok(())
}

pub fn check(template: &Path, schema: &FieldSchema) -> eyre::Result<TemplateCheck> {
    let template = TextTemplate::load(template)?;
    Ok(check_template(&template, schema))
}

/// File name for a report on `patient`, e.g.
/// `C0123_BergAnna_2024_03_05_14_07_09.xlsx`.
pub fn default_output_name(
    patient: &Patient,
    extension: &str,
    at: jiff::civil::DateTime,
) -> String {
    let name: String = format!("{} {}", patient.firstname, patient.lastname)
        .split_whitespace()
        .rev()
        .collect();
    format!(
        "{}_{}_{}.{}",
        patient.patient_code,
        name,
        at.strftime("%Y_%m_%d_%H_%M_%S"),
        extension
    )
}
