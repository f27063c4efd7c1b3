/*!

This is the long-form manual for `course_allotment` and `ocas`.

## How the allotment works

1. Every student receives a merit rank. Students are sorted on the most recent
   semester score (`Sem3`), then `Sem2`, then `Sem1`, then the prior
   qualification score (`PlusTwo`), all in decreasing order. A missing score
   counts as lower than any score. Remaining ties are broken on the name, in
   alphabetical order. The rank is the position in this order, starting at 1:
   no two students share a rank.
2. Students are then served in rank order. Repeated courses in a preference
   list only count once. A student receives the first course of their list
   that still has a seat. Courses that are not in the course table are
   skipped. A student may end up without any course.
3. The allotted students are listed by course and by department. The
   department is the part of the course name before the first `-`: `CS-101`
   and `CS-102` both belong to `CS`, `ART` belongs to `ART`.

The allotment is run once. There is no waiting list: a seat given to a student
is never taken back.

## Input formats

Two tables are needed, either as CSV files (with a header row) or as Excel
(`.xlsx`) worksheets. The format is guessed from the file extension (`.xlsx` is
read as Excel, anything else as CSV) unless `--input-type` is given. For Excel
files, the first worksheet is used unless `--student-worksheet` or
`--course-worksheet` names another one.

### Student table

```text
Candidate Code,Name,Sem1,Sem2,Sem3,PlusTwo,Preference 1,Preference 2,Preference 3
C001,Alice,8.2,8.9,9.1,91,CS-101,PHYS,
C002,Bob,7.5,,8.0,88,CS-101,CS-101,ART
```

Every column starting with `Preference` holds one choice, read from left to
right. Blank cells are skipped. Blank scores are missing scores.

### Course table

```text
Course,Seats
CS-101,30
PHYS,20
ART,0
```

## Output

`ocas` writes three CSV files:

* `final_allotment.csv`: every row of the student table, as it was read, with
  `Rank` and `Allotted` (empty when no course was given) appended, in the order
  of the student table.
* `coursewise_allotment.csv`: the allotted students, grouped by course, sorted
  by rank, with their `Department`.
* `departmentwise_allotment.csv`: the same rows, grouped by department.

With `--summary` (or `generateSummaryJson` in the configuration), the seat usage
of every course is also written to `allotment_summary.json`.

## Configuration

All the options can be passed on the command line. For repeated use, they can
be stored in a JSON configuration file passed with `--config`. Paths are
relative to the configuration file. Command line flags take precedence.

```text
{
  "studentFile": "students.csv",
  "courseFile": "courses.xlsx",
  "courseWorksheetName": "Seats",
  "outputDirectory": "out",
  "generateSummaryJson": true,
  "departmentSeparator": "-",
  "columns": {
    "candidateCode": "Application No",
    "plusTwo": "HSE"
  }
}
```

Any of the column names may be overridden in `columns`: `candidateCode`,
`name`, `sem1`, `sem2`, `sem3`, `plusTwo`, `preferencePrefix`, `course`,
`seats`.

The other keys are `inputType` (`csv` or `excel`, inferred from the file
extension by default) and `studentWorksheetName`, which, like
`courseWorksheetName`, selects a worksheet by name instead of the first one.

 */
