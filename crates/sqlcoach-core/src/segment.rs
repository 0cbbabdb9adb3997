//! Content segmentation: splits assistant/backend text into prose and SQL code
//!
//! Text coming back from the backend is Markdown with embedded SQL examples
//! fenced as `` ```sql ``. Every screen that shows such text splits it the same
//! way: prose runs go to the prose renderer, fenced SQL goes to the code
//! renderer (with a copy affordance).
//!
//! The scanner is line oriented:
//! - an opening fence is a line that trims to `` ```sql `` (tag is
//!   case-insensitive)
//! - a closing fence is a line that trims to `` ``` ``
//! - fences with any other tag are left inside the prose
//! - an opening fence with no closing fence is not code: it and everything
//!   after it stay in the prose run

use serde::Serialize;

/// Fence tag for the query language
pub const SQL_FENCE: &str = "```sql";

/// Closing fence marker
pub const CLOSING_FENCE: &str = "```";

/// Kind of a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    /// Markdown prose
    Prose,
    /// SQL code from a fenced block
    Code,
}

/// One typed slice of a text blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
}

impl Segment {
    pub fn prose(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Prose,
            content: content.into(),
        }
    }

    pub fn code(content: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Code,
            content: content.into(),
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == SegmentKind::Code
    }
}

/// Lazy iterator over the segments of a text.
///
/// A clone continues from the same position, so clone before advancing to
/// replay. Calling [`segments`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
    pending: Option<Segment>,
}

/// Segment `text` lazily
pub fn segments(text: &str) -> Segments<'_> {
    Segments {
        rest: text,
        pending: None,
    }
}

/// Segment `text` eagerly
pub fn segment(text: &str) -> Vec<Segment> {
    segments(text).collect()
}

/// Rebuild text from segments, reinserting SQL fences around code
pub fn reassemble(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment.kind {
            SegmentKind::Prose => segment.content.clone(),
            SegmentKind::Code => format!("{}\n{}\n{}", SQL_FENCE, segment.content, CLOSING_FENCE),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl Iterator for Segments<'_> {
    type Item = Segment;

    fn next(&mut self) -> Option<Segment> {
        if let Some(segment) = self.pending.take() {
            return Some(segment);
        }

        if self.rest.is_empty() {
            return None;
        }

        match find_sql_block(self.rest) {
            Some(block) => {
                let prose = self.rest[..block.open_start].trim();
                let code = Segment::code(self.rest[block.body_start..block.body_end].trim());
                self.rest = &self.rest[block.close_end..];

                if prose.is_empty() {
                    Some(code)
                } else {
                    self.pending = Some(code);
                    Some(Segment::prose(prose))
                }
            }
            None => {
                // No complete fence left: the remainder is one prose run
                let prose = self.rest.trim();
                self.rest = "";
                (!prose.is_empty()).then(|| Segment::prose(prose))
            }
        }
    }
}

/// Byte offsets of a complete fenced SQL block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FencedBlock {
    /// Start of the opening fence line
    open_start: usize,
    /// First byte after the opening fence line
    body_start: usize,
    /// Start of the closing fence line
    body_end: usize,
    /// First byte after the closing fence line
    close_end: usize,
}

#[derive(Debug, Clone, Copy)]
enum ScanState {
    Outside,
    Inside { open_start: usize, body_start: usize },
}

fn find_sql_block(text: &str) -> Option<FencedBlock> {
    let mut state = ScanState::Outside;

    for (start, line) in lines_with_offsets(text) {
        let end = start + line.len();
        state = match state {
            ScanState::Outside if is_sql_fence(line) => ScanState::Inside {
                open_start: start,
                body_start: end,
            },
            ScanState::Inside {
                open_start,
                body_start,
            } if is_closing_fence(line) => {
                return Some(FencedBlock {
                    open_start,
                    body_start,
                    body_end: start,
                    close_end: end,
                });
            }
            other => other,
        };
    }

    // Either no opener at all, or an unterminated one
    None
}

fn lines_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_inclusive('\n').scan(0usize, |offset, line| {
        let start = *offset;
        *offset += line.len();
        Some((start, line))
    })
}

fn is_sql_fence(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case(SQL_FENCE)
}

fn is_closing_fence(line: &str) -> bool {
    line.trim() == CLOSING_FENCE
}
