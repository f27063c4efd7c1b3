use clap::Parser;

/// This is a merit-based course allotment program.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON configuration file. Paths in this file are relative to its location.
    /// All the other options override what the configuration file specifies.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path) The student table: candidate code, name, semester scores, prior qualification score and
    /// the preference columns.
    #[clap(short, long, value_parser)]
    pub students: Option<String>,

    /// (file path) The course table: course name and number of seats.
    #[clap(long, value_parser)]
    pub courses: Option<String>,

    /// (directory or 'stdout') Where to write the final, course-wise and department-wise lists.
    /// Defaults to the current directory.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (csv or excel) The type of the input files. If not provided, it is guessed from the extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: first worksheet) When the student table is an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub student_worksheet: Option<String>,

    /// (default: first worksheet) When the course table is an Excel file, the name of the worksheet to use.
    #[clap(long, value_parser)]
    pub course_worksheet: Option<String>,

    /// If passed as an argument, a JSON summary of the seat usage is also written to the output directory.
    #[clap(long, takes_value = false)]
    pub summary: bool,

    /// (file path) A reference final allotment in CSV format. If provided, the program checks that the
    /// computed allotment matches it and fails otherwise.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
