use serde::Serialize;
use serde_json::{json, Value};

use crate::record::{Attendance, SheetEntry};

/// Background colour in the Sheets API's 0..1 channel scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

pub const PRESENT_COLOR: Color = Color {
    red: 0.1,
    green: 0.5,
    blue: 0.1,
};

pub const ABSENT_COLOR: Color = Color {
    red: 0.5,
    green: 0.1,
    blue: 0.1,
};

pub const ATTENDANCE_COLUMN: u32 = 1;
pub const LEADS_COLUMN: u32 = 2;

/// Minutes as zero-padded `HH:MM:SS`. Hours keep counting past 24.
pub fn format_talk_time(minutes: f64) -> String {
    let total_seconds = (minutes * 60.0).round_ties_even().max(0.0) as u64;
    let hours = total_seconds / 3600;
    let mins = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{:02}:{:02}:{:02}", hours, mins, seconds)
}

/// Cells appended for one entry: date, attendance, leads, dials, talk time, notes.
pub fn row_values(entry: &SheetEntry) -> Vec<Value> {
    vec![
        json!(entry.date),
        json!(entry.attendance.as_str()),
        json!(entry.leads),
        json!(entry.dials),
        json!(format_talk_time(entry.talk_time)),
        json!(entry.notes),
    ]
}

pub fn attendance_color(attendance: Attendance) -> Color {
    if attendance.is_present() {
        PRESENT_COLOR
    } else {
        ABSENT_COLOR
    }
}

pub fn leads_color(leads: u32) -> Option<Color> {
    (leads > 0).then_some(PRESENT_COLOR)
}

/// `batchUpdate` body colouring the cells of the appended row. `row` is the
/// 1-based sheet row.
pub fn format_requests(sheet_id: i64, row: u32, entry: &SheetEntry) -> Value {
    let mut requests = vec![background_request(
        sheet_id,
        row,
        ATTENDANCE_COLUMN,
        attendance_color(entry.attendance),
    )];
    if let Some(color) = leads_color(entry.leads) {
        requests.push(background_request(sheet_id, row, LEADS_COLUMN, color));
    }

    json!({ "requests": requests })
}

fn background_request(sheet_id: i64, row: u32, column: u32, color: Color) -> Value {
    json!({
        "repeatCell": {
            "range": {
                "sheetId": sheet_id,
                "startRowIndex": row - 1,
                "endRowIndex": row,
                "startColumnIndex": column,
                "endColumnIndex": column + 1,
            },
            "cell": {
                "userEnteredFormat": { "backgroundColor": color }
            },
            "fields": "userEnteredFormat.backgroundColor",
        }
    })
}

/// A1 range covering `columns` of the tab `title`, quoted for the API.
pub fn a1_range(title: &str, columns: &str) -> String {
    format!("'{}'!{}", title.replace('\'', "''"), columns)
}
