//! Download builders: spreadsheet workbooks for employees and managers, and the
//! raw JSON category tree.
//!
//! Workbooks are assembled as plain [`Sheet`] tables first so their content can
//! be checked without decoding xlsx; [`write_workbook`] renders them.

use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::Workbook;

use crate::{
    entities::{
        assessment::UserSkillAssessment,
        skill::{flatten_skills, SkillCategory},
        stats::{mean_level, CategorySummary},
        user::TeamMember,
    },
    errors::AppError,
};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const UNKNOWN: &str = "Unknown";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<i8> for Cell {
    fn from(value: i8) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<usize> for Cell {
    fn from(value: usize) -> Self {
        Cell::Number(value as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

/// `M/D/YYYY`, the en-US short date used in every sheet.
pub fn short_date(at: DateTime<Utc>) -> String {
    at.format("%-m/%-d/%Y").to_string()
}

/// Replaces the first space only, matching the download names users already have.
fn dashed_name(name: &str) -> String {
    name.replacen(' ', "-", 1)
}

pub fn json_file_name(user_name: &str, today: NaiveDate) -> String {
    format!("skill-matrix-{}-{}.json", dashed_name(user_name), today.format("%Y-%m-%d"))
}

pub fn assessment_file_name(user_name: &str) -> String {
    format!("{}-skills-assessment.xlsx", dashed_name(user_name))
}

pub fn team_report_file_name(today: NaiveDate) -> String {
    format!("team-skills-report-{}.xlsx", today.format("%Y-%m-%d"))
}

/// The employee's own workbook: one row per skill plus a summary sheet.
pub fn assessment_sheets(categories: &[SkillCategory], user_name: &str, now: DateTime<Utc>) -> Vec<Sheet> {
    let rows: Vec<Vec<Cell>> = categories
        .iter()
        .flat_map(|category| {
            category.skills.iter().map(move |skill| {
                vec![
                    category.name.as_str().into(),
                    skill.name.as_str().into(),
                    skill.level.value().into(),
                    skill.level.label().into(),
                    skill.description.clone().unwrap_or_default().into(),
                    short_date(skill.last_updated).into(),
                    (if skill.is_custom { "Yes" } else { "No" }).into(),
                ]
            })
        })
        .collect();

    let skills = flatten_skills(categories);
    let expert_skills = skills.iter().filter(|s| s.level.value() == 4).count();

    let summary = vec![
        vec!["Total Skills".into(), skills.len().into()],
        vec!["Average Level".into(), format!("{:.2}", mean_level(skills.iter())).into()],
        vec!["Expert Skills".into(), expert_skills.into()],
        vec!["Assessment Date".into(), short_date(now).into()],
        vec!["Employee".into(), user_name.into()],
    ];

    vec![
        Sheet {
            name: "Skills Assessment",
            headers: vec![
                "Category",
                "Skill Name",
                "Level",
                "Level Name",
                "Description",
                "Last Updated",
                "Custom Skill",
            ],
            rows,
        },
        Sheet {
            name: "Summary",
            headers: vec!["Metric", "Value"],
            rows: summary,
        },
    ]
}

/// Manager report across every ledger entry, with a per-category rollup.
pub fn team_report_sheets(
    assessments: &[UserSkillAssessment],
    roster: &[TeamMember],
    category_summaries: &[CategorySummary],
) -> Vec<Sheet> {
    let detail = assessments
        .iter()
        .flat_map(|assessment| {
            let (name, email, position, department) =
                match roster.iter().find(|m| m.id == assessment.user_id) {
                    Some(m) => (m.name.as_str(), m.email.as_str(), m.position.as_str(), m.department.as_str()),
                    None => (UNKNOWN, UNKNOWN, UNKNOWN, UNKNOWN),
                };
            assessment.skills.iter().map(move |skill| {
                vec![
                    name.into(),
                    email.into(),
                    position.into(),
                    department.into(),
                    skill.name.as_str().into(),
                    skill.category.as_str().into(),
                    skill.level.value().into(),
                    skill.level.label().into(),
                    short_date(skill.last_updated).into(),
                    assessment.status.as_str().into(),
                    short_date(assessment.completed_at).into(),
                ]
            })
        })
        .collect();

    let rollup = category_summaries
        .iter()
        .map(|summary| {
            vec![
                summary.category.as_str().into(),
                summary.total_skills.into(),
                format!("{:.2}", summary.team_average_level).into(),
                summary.expert_count.into(),
                summary.skills_assessed.into(),
            ]
        })
        .collect();

    vec![
        Sheet {
            name: "Detailed Skills Report",
            headers: vec![
                "Employee Name",
                "Employee Email",
                "Position",
                "Department",
                "Skill Name",
                "Category",
                "Level",
                "Level Name",
                "Last Updated",
                "Assessment Status",
                "Completed At",
            ],
            rows: detail,
        },
        Sheet {
            name: "Category Summary",
            headers: vec![
                "Category",
                "Total Skills",
                "Team Average Level",
                "Expert Count",
                "Skills Assessed",
            ],
            rows: rollup,
        },
    ]
}

/// A single employee's ledger entry, as exported from the dashboard.
pub fn individual_report_sheets(assessment: &UserSkillAssessment) -> Vec<Sheet> {
    let rows = assessment
        .skills
        .iter()
        .map(|skill| {
            vec![
                skill.name.as_str().into(),
                skill.category.as_str().into(),
                skill.level.value().into(),
                skill.level.label().into(),
                skill.description.clone().unwrap_or_default().into(),
                short_date(skill.last_updated).into(),
            ]
        })
        .collect();

    vec![Sheet {
        name: "Skills Assessment",
        headers: vec![
            "Skill Name",
            "Category",
            "Level",
            "Level Name",
            "Description",
            "Last Updated",
        ],
        rows,
    }]
}

pub fn write_workbook(sheets: &[Sheet]) -> Result<Vec<u8>, AppError> {
    let mut workbook = Workbook::new();

    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name)?;

        for (col, header) in sheet.headers.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }
        for (row, cells) in sheet.rows.iter().enumerate() {
            let row = row as u32 + 1;
            for (col, cell) in cells.iter().enumerate() {
                match cell {
                    Cell::Text(text) => worksheet.write_string(row, col as u16, text)?,
                    Cell::Number(number) => worksheet.write_number(row, col as u16, *number)?,
                };
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
