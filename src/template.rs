//! Remote path templates.
//!
//! A template such as `{YYYY}/{MM}/rfe{YYYY}_{MM}-dk{P}.nc` maps a reference
//! date and sub-stream to a path, and maps a file name back to its reference
//! date when scanning a local archive or a remote listing.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};

use crate::{
    dekad::{dekad_end, dekad_of, last_day_of_month},
    error::TemplateError,
    plan::SubStream,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    MonthShort,
    Day,
    DayShort,
    Dekad,
    Hour,
    Minute,
    Second,
    Region,
    Variable,
}

impl Field {
    fn from_token(token: &str) -> Option<Self> {
        let field = match token {
            "YYYY" => Field::Year,
            "MM" => Field::Month,
            "M" => Field::MonthShort,
            "DD" | "TT" => Field::Day,
            "D" => Field::DayShort,
            "P" => Field::Dekad,
            "hh" => Field::Hour,
            "mm" => Field::Minute,
            "ss" => Field::Second,
            "region" => Field::Region,
            "variable" => Field::Variable,
            _ => return None,
        };

        Some(field)
    }

    // (min, max) digits consumed when parsing a numeric field.
    fn width(self) -> (usize, usize) {
        match self {
            Field::Year => (4, 4),
            Field::Month | Field::Day | Field::Hour | Field::Minute | Field::Second => (2, 2),
            Field::MonthShort | Field::DayShort => (1, 2),
            Field::Dekad => (1, 1),
            Field::Region | Field::Variable => (0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A parsed path template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTemplate {
    source: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Default)]
struct Captured {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    dekad: Option<u32>,
}

impl PathTemplate {
    /// Renders the path of the file published for `date` on `stream`.
    pub fn render(&self, date: NaiveDate, stream: &SubStream) -> String {
        let mut out = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => match field {
                    Field::Year => out.push_str(&format!("{:04}", date.year())),
                    Field::Month => out.push_str(&format!("{:02}", date.month())),
                    Field::MonthShort => out.push_str(&date.month().to_string()),
                    Field::Day => out.push_str(&format!("{:02}", date.day())),
                    Field::DayShort => out.push_str(&date.day().to_string()),
                    Field::Dekad => out.push_str(&dekad_of(date).to_string()),
                    Field::Hour | Field::Minute | Field::Second => out.push_str("00"),
                    Field::Region => out.push_str(&stream.region),
                    Field::Variable => out.push_str(&stream.variable),
                },
            }
        }

        out
    }

    /// Splits the template at its last `/` into a directory part and a file
    /// name part. The directory part is empty for bare file names.
    pub fn split(&self) -> (PathTemplate, PathTemplate) {
        let position = self.segments.iter().rposition(|segment| {
            matches!(segment, Segment::Literal(text) if text.contains('/'))
        });

        let Some(position) = position else {
            return (PathTemplate::empty(), self.clone());
        };

        let mut directory = self.segments[..position].to_vec();
        let mut file_name = Vec::new();

        if let Segment::Literal(text) = &self.segments[position] {
            if let Some((head, tail)) = text.rsplit_once('/') {
                if !head.is_empty() {
                    directory.push(Segment::Literal(head.to_string()));
                }
                if !tail.is_empty() {
                    file_name.push(Segment::Literal(tail.to_string()));
                }
            }
        }
        file_name.extend_from_slice(&self.segments[position + 1..]);

        (
            PathTemplate::from_segments(directory),
            PathTemplate::from_segments(file_name),
        )
    }

    /// Returns the reference date encoded in `name`.
    ///
    /// The day comes from the dekad token if present, then from a day token,
    /// and otherwise defaults to the last day of the month.
    pub fn parse_date(&self, name: &str, stream: &SubStream) -> Result<NaiveDate, TemplateError> {
        let mismatch = || TemplateError::Mismatch {
            name: name.to_string(),
            template: self.source.clone(),
        };

        let mut rest = name;
        let mut captured = Captured::default();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => {
                    rest = rest.strip_prefix(text.as_str()).ok_or_else(mismatch)?;
                }
                Segment::Field(Field::Region) => {
                    rest = rest.strip_prefix(stream.region.as_str()).ok_or_else(mismatch)?;
                }
                Segment::Field(Field::Variable) => {
                    rest = rest
                        .strip_prefix(stream.variable.as_str())
                        .ok_or_else(mismatch)?;
                }
                Segment::Field(field) => {
                    let (min, max) = field.width();
                    let digits = rest
                        .bytes()
                        .take(max)
                        .take_while(|b| b.is_ascii_digit())
                        .count();
                    if digits < min {
                        return Err(mismatch());
                    }
                    let value: u32 = rest[..digits].parse().map_err(|_| mismatch())?;
                    rest = &rest[digits..];

                    match field {
                        Field::Year => captured.year = Some(value as i32),
                        Field::Month | Field::MonthShort => captured.month = Some(value),
                        Field::Day | Field::DayShort => captured.day = Some(value),
                        Field::Dekad => captured.dekad = Some(value),
                        _ => {}
                    }
                }
            }
        }

        if !rest.is_empty() {
            return Err(mismatch());
        }

        let invalid = || TemplateError::InvalidDate(name.to_string());
        let year = captured.year.ok_or_else(mismatch)?;
        let month = captured.month.unwrap_or(1);

        match (captured.dekad, captured.day) {
            (Some(dekad), _) => dekad_end(year, month, dekad),
            (None, Some(day)) => NaiveDate::from_ymd_opt(year, month, day),
            (None, None) => last_day_of_month(year, month),
        }
        .ok_or_else(invalid)
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    fn empty() -> Self {
        PathTemplate {
            source: String::new(),
            segments: Vec::new(),
        }
    }

    fn from_segments(segments: Vec<Segment>) -> Self {
        let source = segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.clone(),
                Segment::Field(field) => format!("{{{}}}", token_name(*field)),
            })
            .collect();

        PathTemplate { source, segments }
    }
}

fn token_name(field: Field) -> &'static str {
    match field {
        Field::Year => "YYYY",
        Field::Month => "MM",
        Field::MonthShort => "M",
        Field::Day => "DD",
        Field::DayShort => "D",
        Field::Dekad => "P",
        Field::Hour => "hh",
        Field::Minute => "mm",
        Field::Second => "ss",
        Field::Region => "region",
        Field::Variable => "variable",
    }
}

impl FromStr for PathTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = s;

        while let Some(open) = rest.find('{') {
            literal.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let close = after
                .find('}')
                .ok_or_else(|| TemplateError::Unterminated(s.to_string()))?;
            let token = &after[..close];
            let field =
                Field::from_token(token).ok_or_else(|| TemplateError::UnknownToken(token.to_string()))?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
            rest = &after[close + 1..];
        }
        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.contains(&Segment::Field(Field::Year)) {
            return Err(TemplateError::MissingYear(s.to_string()));
        }

        Ok(PathTemplate {
            source: s.to_string(),
            segments,
        })
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// -- Tests -------------------------------------------------------------------
