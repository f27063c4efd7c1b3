use log::{debug, info, warn};

use course_allotment::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::alloc::config_reader::*;
use crate::args::Args;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;
pub mod output;

#[derive(Debug, Snafu)]
pub enum OcasError {
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Excel file {path} has no worksheet named {name:?}"))]
    MissingWorksheet { path: String, name: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV output {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the configuration {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("No {what} given: use the command line or the configuration file"))]
    MissingInput { what: String },
    #[snafu(display("Unknown input type {input_type:?} (expected csv or excel)"))]
    UnknownInputType { input_type: String },
    #[snafu(display("The allotment could not run: {source}"))]
    Allotment { source: AllotmentErrors },
    #[snafu(display("The computed allotment differs from the reference {path}"))]
    ReferenceMismatch { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type OcasResult<T> = Result<T, OcasError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Csv,
    Excel,
}

impl InputType {
    pub fn parse(s: &str) -> OcasResult<InputType> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(InputType::Csv),
            "excel" | "xlsx" => Ok(InputType::Excel),
            _ => UnknownInputTypeSnafu { input_type: s }.fail(),
        }
    }

    /// Guessed from the file extension: `.xlsx` files are Excel, anything
    /// else is read as CSV.
    pub fn infer(path: &Path) -> InputType {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("xlsx") => InputType::Excel,
            _ => InputType::Csv,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum OutputTarget {
    Stdout,
    Directory(PathBuf),
}

/// Everything needed for one run, once the command line and the configuration
/// file have been merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub student_file: PathBuf,
    pub course_file: PathBuf,
    pub input_type: Option<InputType>,
    pub student_worksheet: Option<String>,
    pub course_worksheet: Option<String>,
    pub output: OutputTarget,
    pub summary: bool,
    pub reference: Option<PathBuf>,
    pub rules: AllotmentRules,
}

impl RunSettings {
    /// Command line flags take precedence over the configuration file. Paths
    /// from the configuration file are relative to its directory.
    pub fn resolve(args: &Args) -> OcasResult<RunSettings> {
        let (config, root) = match args.config.as_deref() {
            Some(p) => {
                let config = read_config(p)?;
                let root = Path::new(p)
                    .parent()
                    .map(|d| d.to_path_buf())
                    .unwrap_or_default();
                (config, root)
            }
            None => (AllotConfig::default(), PathBuf::new()),
        };
        debug!("resolve: config: {:?}", config);

        let from_config = |p: &Option<String>| p.as_ref().map(|s| root.join(s));

        let student_file = args
            .students
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| from_config(&config.student_file))
            .context(MissingInputSnafu {
                what: "student file",
            })?;
        let course_file = args
            .courses
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| from_config(&config.course_file))
            .context(MissingInputSnafu {
                what: "course file",
            })?;

        let input_type = match args.input_type.as_ref().or(config.input_type.as_ref()) {
            Some(s) => Some(InputType::parse(s)?),
            None => None,
        };

        let output = match args.out.as_deref() {
            Some("stdout") => OutputTarget::Stdout,
            Some(d) => OutputTarget::Directory(PathBuf::from(d)),
            None => match from_config(&config.output_directory) {
                Some(d) => OutputTarget::Directory(d),
                None => OutputTarget::Directory(PathBuf::from(".")),
            },
        };

        Ok(RunSettings {
            student_file,
            course_file,
            input_type,
            student_worksheet: args
                .student_worksheet
                .clone()
                .or_else(|| config.student_worksheet_name.clone()),
            course_worksheet: args
                .course_worksheet
                .clone()
                .or_else(|| config.course_worksheet_name.clone()),
            output,
            summary: args.summary || config.generate_summary_json.unwrap_or(false),
            reference: args.reference.as_ref().map(PathBuf::from),
            rules: config.rules()?,
        })
    }
}

fn read_table(
    path: &Path,
    input_type: Option<InputType>,
    worksheet: Option<&str>,
) -> OcasResult<Table> {
    let p = path.display().to_string();
    let input_type = input_type.unwrap_or_else(|| InputType::infer(path));
    info!("Attempting to read {:?} as {:?}", p, input_type);
    let table = match input_type {
        InputType::Csv => {
            if worksheet.is_some() {
                warn!("read_table: {}: worksheet name ignored for CSV input", p);
            }
            io_csv::read_csv_table(&p)?
        }
        InputType::Excel => io_excel::read_excel_table(&p, worksheet)?,
    };
    debug!(
        "read_table: {}: columns {:?}, {} rows",
        p,
        table.columns,
        table.rows.len()
    );
    Ok(table)
}

/// Reads the inputs, runs the allotment and writes the three lists.
pub fn run_allotment_files(settings: &RunSettings) -> OcasResult<AllotmentResult> {
    let students = read_table(
        &settings.student_file,
        settings.input_type,
        settings.student_worksheet.as_deref(),
    )?;
    let courses = read_table(
        &settings.course_file,
        settings.input_type,
        settings.course_worksheet.as_deref(),
    )?;

    let result =
        run_allotment(&students, &courses, &settings.rules).context(AllotmentSnafu {})?;

    let names = &settings.rules.columns;
    match &settings.output {
        OutputTarget::Stdout => {
            print!("{}", output::render_all(&students, names, &result)?);
        }
        OutputTarget::Directory(dir) => {
            let written = output::write_all(dir, &students, names, &result)?;
            for p in written {
                info!("Wrote {}", p.display());
            }
            if settings.summary {
                let p = output::write_summary(dir, &build_summary_js(settings, &result))?;
                info!("Wrote {}", p.display());
            }
        }
    }

    if let Some(reference) = &settings.reference {
        check_reference(reference, &students, names, &result)?;
    }
    Ok(result)
}

pub fn build_summary_js(settings: &RunSettings, result: &AllotmentResult) -> JSValue {
    output::summary_json(
        &settings.student_file.display().to_string(),
        &settings.course_file.display().to_string(),
        result,
    )
}

/// Compares the final list with a reference CSV file, after both went through
/// the same CSV rendering.
fn check_reference(
    reference: &Path,
    students: &Table,
    names: &ColumnNames,
    result: &AllotmentResult,
) -> OcasResult<()> {
    let p = reference.display().to_string();
    let expected = io_csv::read_csv_table(&p)?;
    let expected_s = output::render_table(&expected)?;
    let computed_s = output::render_table(&output::final_table(students, names, result))?;
    if expected_s != computed_s {
        warn!("Found differences with the reference {}", p);
        print_diff(expected_s.as_str(), computed_s.as_str(), "\n");
        return ReferenceMismatchSnafu { path: p }.fail();
    }
    info!("The allotment matches the reference {}", p);
    Ok(())
}

pub fn run(args: &Args) -> OcasResult<()> {
    let settings = RunSettings::resolve(args)?;
    info!("settings: {:?}", settings);
    run_allotment_files(&settings)?;
    Ok(())
}
