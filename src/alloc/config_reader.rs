use crate::alloc::*;

use serde::{Deserialize, Serialize};

/// Overrides for the column names of the input tables. Missing entries keep
/// their default name.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnSettings {
    #[serde(rename = "candidateCode")]
    pub candidate_code: Option<String>,
    pub name: Option<String>,
    pub sem1: Option<String>,
    pub sem2: Option<String>,
    pub sem3: Option<String>,
    #[serde(rename = "plusTwo")]
    pub plus_two: Option<String>,
    #[serde(rename = "preferencePrefix")]
    pub preference_prefix: Option<String>,
    pub course: Option<String>,
    pub seats: Option<String>,
}

impl ColumnSettings {
    pub fn column_names(&self) -> ColumnNames {
        let d = ColumnNames::default();
        let pick = |o: &Option<String>, default: String| o.clone().unwrap_or(default);
        ColumnNames {
            candidate_code: pick(&self.candidate_code, d.candidate_code),
            name: pick(&self.name, d.name),
            sem1: pick(&self.sem1, d.sem1),
            sem2: pick(&self.sem2, d.sem2),
            sem3: pick(&self.sem3, d.sem3),
            plus_two: pick(&self.plus_two, d.plus_two),
            preference_prefix: pick(&self.preference_prefix, d.preference_prefix),
            course: pick(&self.course, d.course),
            seats: pick(&self.seats, d.seats),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct AllotConfig {
    #[serde(rename = "studentFile")]
    pub student_file: Option<String>,
    #[serde(rename = "courseFile")]
    pub course_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "studentWorksheetName")]
    pub student_worksheet_name: Option<String>,
    #[serde(rename = "courseWorksheetName")]
    pub course_worksheet_name: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "generateSummaryJson")]
    pub generate_summary_json: Option<bool>,
    #[serde(rename = "departmentSeparator")]
    pub department_separator: Option<String>,
    pub columns: Option<ColumnSettings>,
}

impl AllotConfig {
    pub fn rules(&self) -> OcasResult<AllotmentRules> {
        let department_separator = match self.department_separator.as_deref() {
            None => AllotmentRules::default().department_separator,
            Some(s) => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => c,
                    _ => whatever!(
                        "departmentSeparator must be a single character, got {:?}",
                        s
                    ),
                }
            }
        };
        Ok(AllotmentRules {
            columns: self
                .columns
                .as_ref()
                .map(|c| c.column_names())
                .unwrap_or_default(),
            department_separator,
        })
    }
}

pub fn read_config(path: &str) -> OcasResult<AllotConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: AllotConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(config)
}
