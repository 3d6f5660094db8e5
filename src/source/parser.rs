//! Tab-separated vote matrix parsing.
//!
//! A dataset comes as two files: the division matrix (`.dat`, one row per
//! division, one `mpid<N>` column per member) and the member table (`.txt`,
//! a free-text preamble followed by a tab-separated table whose header line
//! contains `firstname`).

use crate::models::{Division, Member, MemberDirectory, MemberId, VoteCode};
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised for malformed dataset tables.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("table is empty")]
    EmptyTable,

    #[error("no header line containing '{0}'")]
    MissingHeader(&'static str),

    #[error("missing column '{0}'")]
    MissingColumn(&'static str),

    #[error("invalid member column '{0}'")]
    InvalidMemberColumn(String),

    #[error("line {line}: invalid date '{value}'")]
    InvalidDate { line: usize, value: String },

    #[error("line {line}: invalid vote code '{value}' for {member}")]
    InvalidVoteCode {
        line: usize,
        member: MemberId,
        value: String,
    },

    #[error("line {line}: invalid member id '{value}'")]
    InvalidMemberId { line: usize, value: String },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DIVISION_NUMBER_COLUMNS: &[&str] = &["divnumber", "divno", "voteno"];
const MISSING_MARKERS: &[&str] = &["", "NA", "NaN", "nan"];

/// Split a line into trimmed, unquoted fields.
fn split_fields(line: &str) -> Vec<&str> {
    line.trim_end_matches(['\r', '\n'])
        .split('\t')
        .map(|field| field.trim().trim_matches('"'))
        .collect()
}

fn column(headers: &[&str], name: &'static str) -> Result<usize, ParseError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or(ParseError::MissingColumn(name))
}

/// Parse a division date. Timestamps are truncated to their date part.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let date_part = value
        .split(|c| c == ' ' || c == 'T')
        .next()
        .unwrap_or(value);

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())
}

/// Parse a vote cell. `Ok(None)` means the member has no record.
fn parse_vote(value: &str) -> Result<Option<VoteCode>, ()> {
    if MISSING_MARKERS.contains(&value) {
        return Ok(None);
    }

    let code = match value.parse::<i32>() {
        Ok(code) => code,
        // Matrices exported through spreadsheets sometimes carry "2.0"
        Err(_) => match value.parse::<f64>() {
            Ok(f) if f.fract() == 0.0 => f as i32,
            _ => return Err(()),
        },
    };

    Ok(VoteCode::from_code(code))
}

/// Parse the division matrix.
pub fn parse_divisions(text: &str) -> Result<Vec<Division>, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines.next().ok_or(ParseError::EmptyTable)?;
    let headers = split_fields(header_line);

    let date_col = column(&headers, "date")?;
    let number_col = DIVISION_NUMBER_COLUMNS
        .iter()
        .find_map(|&name| column(&headers, name).ok());

    let mut member_cols = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if MemberId::is_column_header(header) {
            let id = header
                .parse::<MemberId>()
                .map_err(|_| ParseError::InvalidMemberColumn(header.to_string()))?;
            member_cols.push((index, id));
        }
    }

    let mut divisions = Vec::new();
    for (index, line) in lines {
        let line_no = index + 1;
        let fields = split_fields(line);

        let raw_date = fields.get(date_col).copied().unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| ParseError::InvalidDate {
            line: line_no,
            value: raw_date.to_string(),
        })?;

        let mut division = Division::new(date);
        division.number = number_col
            .and_then(|col| fields.get(col))
            .and_then(|value| value.parse().ok());

        for (col, member) in &member_cols {
            let value = fields.get(*col).copied().unwrap_or_default();
            let code = parse_vote(value).map_err(|_| ParseError::InvalidVoteCode {
                line: line_no,
                member: *member,
                value: value.to_string(),
            })?;
            if let Some(code) = code {
                division.votes.insert(*member, code);
            }
        }

        divisions.push(division);
    }

    Ok(divisions)
}

/// Parse the member table, skipping any preamble before its header line.
pub fn parse_members(text: &str) -> Result<MemberDirectory, ParseError> {
    let mut lines = text
        .lines()
        .enumerate()
        .skip_while(|(_, line)| !split_fields(line).iter().any(|f| *f == "firstname"));

    let (_, header_line) = lines.next().ok_or(ParseError::MissingHeader("firstname"))?;
    let headers = split_fields(header_line);

    let id_col = column(&headers, "mpid")?;
    let first_col = column(&headers, "firstname")?;
    let surname_col = column(&headers, "surname")?;
    let party_col = column(&headers, "party")?;

    let mut directory = MemberDirectory::new();
    for (index, line) in lines {
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 1;
        let fields = split_fields(line);
        let field = |col: usize, name: &'static str| -> Result<String, ParseError> {
            match fields.get(col) {
                Some(value) if !value.is_empty() => Ok(value.to_string()),
                _ => Err(ParseError::MissingField {
                    line: line_no,
                    field: name,
                }),
            }
        };

        let raw_id = field(id_col, "mpid")?;
        let id = raw_id
            .parse::<MemberId>()
            .map_err(|_| ParseError::InvalidMemberId {
                line: line_no,
                value: raw_id.clone(),
            })?;

        directory.insert(Member {
            id,
            first_name: field(first_col, "firstname")?,
            surname: field(surname_col, "surname")?,
            party: field(party_col, "party")?,
        });
    }

    Ok(directory)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIVISIONS: &str = "rowid\tdate\tdivnumber\tBill\tmpid1\tmpid2\tmpid3\n\
        1\t2017-06-28\t1\t\"Queen's Speech\"\t2\t4\t-9\n\
        2\t2017-06-29\t2\tFinance\t4\t4\t\n\
        3\t2018-01-10\t3\tBrexit\t2.0\t0\t2\n";

    const MEMBERS: &str = "Vote matrix for the 2017 parliament\n\
        Codes: -9 missing, 0 absent, 2 aye, 4 nay\n\
        \n\
        mpid\tfirstname\tsurname\tparty\trow\n\
        1\tDiane\tAbbott\tLab\t1\n\
        2\tNigel\tAdams\tCon\t2\n\
        \n\
        3\tAlan\tBrown\tSNP\t3\n";

    #[test]
    fn test_parse_divisions() {
        let divisions = parse_divisions(DIVISIONS).unwrap();
        assert_eq!(divisions.len(), 3);

        let first = &divisions[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2017, 6, 28).unwrap());
        assert_eq!(first.number, Some(1));
        assert_eq!(first.votes.get(&MemberId(1)), Some(&VoteCode::Aye));
        assert_eq!(first.votes.get(&MemberId(2)), Some(&VoteCode::Nay));
        assert!(!first.votes.contains_key(&MemberId(3)));

        assert!(!divisions[1].votes.contains_key(&MemberId(3)));
        assert_eq!(divisions[2].year(), 2018);
        assert_eq!(divisions[2].votes.get(&MemberId(1)), Some(&VoteCode::Aye));
        assert_eq!(divisions[2].votes.get(&MemberId(2)), Some(&VoteCode::Absent));
    }

    #[test]
    fn test_invalid_date_is_error() {
        let text = "date\tmpid1\nnot-a-date\t2\n";
        let err = parse_divisions(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::InvalidDate {
                line: 2,
                value: "not-a-date".to_string()
            }
        );
    }

    #[test]
    fn test_missing_date_column() {
        let err = parse_divisions("rowid\tmpid1\n1\t2\n").unwrap_err();
        assert_eq!(err, ParseError::MissingColumn("date"));
    }

    #[test]
    fn test_invalid_vote_code() {
        let err = parse_divisions("date\tmpid7\n2001-01-01\taye\n").unwrap_err();
        assert!(matches!(
            err,
            ParseError::InvalidVoteCode { member: MemberId(7), .. }
        ));
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(parse_divisions("\n\n").unwrap_err(), ParseError::EmptyTable);
    }

    #[test]
    fn test_header_only_table_has_no_divisions() {
        assert!(parse_divisions("date\tmpid1\n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1997, 5, 14);
        assert_eq!(parse_date("1997-05-14"), expected);
        assert_eq!(parse_date("1997-05-14 00:00:00"), expected);
        assert_eq!(parse_date("14/05/1997"), expected);
        assert_eq!(parse_date("May 1997"), None);
    }

    #[test]
    fn test_parse_members_skips_preamble() {
        let directory = parse_members(MEMBERS).unwrap();
        assert_eq!(directory.len(), 3);

        let abbott = directory.get(MemberId(1)).unwrap();
        assert_eq!(abbott.display_label(), "Abbott,D. (Lab)");
        assert_eq!(directory.get(MemberId(3)).unwrap().party, "SNP");
    }

    #[test]
    fn test_members_without_header() {
        let err = parse_members("just some text\nno table here\n").unwrap_err();
        assert_eq!(err, ParseError::MissingHeader("firstname"));
    }

    #[test]
    fn test_member_missing_first_name() {
        let text = "mpid\tfirstname\tsurname\tparty\n4\t\tSmith\tLab\n";
        let err = parse_members(text).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingField {
                line: 2,
                field: "firstname"
            }
        );
    }

    #[test]
    fn test_member_invalid_id() {
        let text = "mpid\tfirstname\tsurname\tparty\nabc\tJo\tSmith\tLab\n";
        assert!(matches!(
            parse_members(text).unwrap_err(),
            ParseError::InvalidMemberId { line: 2, .. }
        ));
    }
}
