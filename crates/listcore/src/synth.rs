//! Edit synthesis: next-marker insertion after a line break, and renumbering
//! of the list run that follows a merge.

use crate::codec::{decode, encode, MarkerFamily};
use crate::edit::{EditBatch, EditOp};
use crate::pattern::{classify_in, decompose, LineDecomposition, IDEOGRAPHIC_COMMA};
use crate::source::LineSource;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesizer {
    families: Vec<MarkerFamily>,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self {
            families: MarkerFamily::ALL.to_vec(),
        }
    }
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only recognize markers of `families`.
    pub fn with_families(families: &[MarkerFamily]) -> Self {
        Self {
            families: families.to_vec(),
        }
    }

    pub fn families(&self) -> &[MarkerFamily] {
        &self.families
    }

    fn classify(&self, line: &LineDecomposition<'_>) -> Option<MarkerFamily> {
        classify_in(line, &self.families)
    }

    /// Handles text containing a line break inserted at `from..to` (offsets in
    /// `doc`, which already contains the insertion).
    ///
    /// Continues the list on the new line, or removes a marker left with no
    /// text when the user breaks the line a second time.
    pub fn continue_list<S: LineSource + ?Sized>(
        &self,
        doc: &S,
        from: usize,
        to: usize,
    ) -> Option<EditBatch> {
        let current = doc.line_of_offset(from);
        let next = doc.line_of_offset(to);
        if next <= current {
            return None;
        }

        let current_text = doc.line_text(current)?;
        if current_text.trim().is_empty() {
            return None;
        }
        let next_text = doc.line_text(next)?;

        let line = decompose(&current_text);
        let family = self.classify(&line)?;

        if line.rest_is_blank() && next_text.trim().is_empty() {
            let start = doc.line_start(current);
            let end = doc.line_end_inclusive(current);
            log::debug!("removing empty list marker on line {}", current);
            return Some(EditBatch::new(vec![EditOp::delete(start, end)]).with_cursor(start));
        }

        // Bare "3." followed by text is too often just a number.
        if family == MarkerFamily::Arabic && !line.has_brackets() {
            return None;
        }

        let ordinal = decode(line.marker, family)?;
        let mut marker = render_prefix(&line, family, ordinal.checked_add(1)?)?;
        if line.separator != Some(IDEOGRAPHIC_COMMA) {
            marker.push(' ');
        }

        let at = doc.line_start(next);
        let cursor = at + marker.chars().count();
        log::debug!("continuing {:?} list on line {} with {:?}", family, next, marker);
        Some(EditBatch::new(vec![EditOp::insert(at, marker)]).with_cursor(cursor))
    }

    /// Handles a deletion of `deleted` that left the merge point at `from`
    /// (an offset in `doc`, which no longer contains the deleted text).
    ///
    /// Renumbers the run of list lines directly after the merge point. When
    /// the deletion removed a line break and the merged line is an item of the
    /// same family, numbering continues from it; otherwise it restarts at 1.
    pub fn renumber_after_merge<S: LineSource + ?Sized>(
        &self,
        doc: &S,
        from: usize,
        deleted: &str,
    ) -> Option<EditBatch> {
        let merge_line = doc.line_of_offset(from);
        let merged_text = doc.line_text(merge_line)?;
        let crossed_lines = deleted.contains('\n');
        if !crossed_lines && !merged_text.trim().is_empty() {
            return None;
        }

        let next = merge_line + 1;
        if next >= doc.line_count() {
            return None;
        }
        let next_text = doc.line_text(next)?;
        let family = self.classify(&decompose(&next_text))?;

        let base = if crossed_lines {
            let merged = decompose(&merged_text);
            match self.classify(&merged) {
                Some(prev) if prev == family => match decode(merged.marker, family) {
                    Some(n) => n.checked_add(1)?,
                    None => 1,
                },
                _ => 1,
            }
        } else {
            1
        };

        let edits = self.renumber_run(doc, next, family, base);
        if edits.is_empty() {
            return None;
        }
        log::debug!("renumbering {} line(s) from line {} starting at {}", edits.len(), next, base);
        let batch = EditBatch::new(edits);
        let cursor = batch.map_offset(from);
        Some(batch.with_cursor(cursor))
    }

    /// Numbers the consecutive `family` lines starting at `first` as `base`,
    /// `base + 1`, ... and returns the edits for the lines that differ.
    ///
    /// The run ends at the first line that is not a `family` marker or whose
    /// ordinal cannot be decoded or encoded, and after the line numbered
    /// `u32::MAX`.
    pub fn renumber_run<S: LineSource + ?Sized>(
        &self,
        doc: &S,
        first: usize,
        family: MarkerFamily,
        base: u32,
    ) -> Vec<EditOp> {
        let mut edits = Vec::new();
        let mut expected = base;
        for line_no in first..doc.line_count() {
            let Some(text) = doc.line_text(line_no) else {
                break;
            };
            let line = decompose(&text);
            if self.classify(&line) != Some(family) {
                break;
            }
            let Some(current) = decode(line.marker, family) else {
                break;
            };
            if current != expected {
                let Some(prefix) = render_prefix(&line, family, expected) else {
                    break;
                };
                let start = doc.line_start(line_no);
                edits.push(EditOp::replace(start, start + line.prefix_len, prefix));
            }
            let Some(next) = expected.checked_add(1) else {
                break;
            };
            expected = next;
        }
        edits
    }
}

/// Marker prefix for `ordinal` in the style of `line`: same brackets, same
/// separator, and lowercase roman numerals when the line used them.
fn render_prefix(line: &LineDecomposition<'_>, family: MarkerFamily, ordinal: u32) -> Option<String> {
    let mut token = encode(ordinal, family)?;
    if family == MarkerFamily::RomanNumeral && line.marker.chars().all(|c| c.is_ascii_lowercase()) {
        token.make_ascii_lowercase();
    }
    Some(line.with_token(&token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::TextSnapshot;
    use insta::assert_snapshot;

    /// Simulates typing a line break at the end of `line` in `text`.
    fn press_enter(text: &str, line: usize) -> (String, usize, usize) {
        let mut lines: Vec<&str> = text.split('\n').collect();
        let from: usize = lines[..=line].iter().map(|l| l.chars().count() + 1).sum::<usize>() - 1;
        lines.insert(line + 1, "");
        (lines.join("\n"), from, from + 1)
    }

    fn enter_result(text: &str, line: usize) -> Option<(String, Option<usize>)> {
        let (after, from, to) = press_enter(text, line);
        let doc = TextSnapshot::new(&after);
        Synthesizer::new()
            .continue_list(&doc, from, to)
            .map(|batch| (batch.apply_to(&after), batch.cursor))
    }

    #[test]
    fn test_enter_continues_bracketed_letter() {
        let (text, cursor) = enter_result("(a) foo", 0).unwrap();
        assert_eq!(text, "(a) foo\n(b) ");
        assert_eq!(cursor, Some(12));
    }

    #[test]
    fn test_enter_continues_roman_with_ideographic_comma() {
        let (text, cursor) = enter_result("III、 foo", 0).unwrap();
        assert_snapshot!(text, @r"
        III、 foo
        IV、
        ");
        assert_eq!(cursor, Some(12));
    }

    #[test]
    fn test_enter_skips_bare_arabic() {
        assert_eq!(enter_result("1. foo", 0), None);
    }

    #[test]
    fn test_enter_continues_bracketed_arabic() {
        let (text, _) = enter_result("(1) foo", 0).unwrap();
        assert_eq!(text, "(1) foo\n(2) ");
        let (text, _) = enter_result("9) foo", 0).unwrap();
        assert_eq!(text, "9) foo\n10) ");
    }

    #[test]
    fn test_enter_preserves_mismatched_brackets() {
        let (text, _) = enter_result("[c） foo", 0).unwrap();
        assert_eq!(text, "[c） foo\n[d） ");
    }

    #[test]
    fn test_enter_lowercase_roman_and_chinese() {
        let (text, _) = enter_result("xiv. item", 0).unwrap();
        assert_eq!(text, "xiv. item\nxv. ");
        let (text, _) = enter_result("【九】、事项", 0).unwrap();
        assert_eq!(text, "【九】、事项\n【十】、");
        assert_eq!(enter_result("十、事项", 0), None);
    }

    #[test]
    fn test_enter_letter_overflow_stops() {
        assert_eq!(enter_result("z. last", 0), None);
        assert_eq!(enter_result("Y. item", 0).unwrap().0, "Y. item\nZ. ");
    }

    #[test]
    fn test_enter_on_blank_or_plain_line() {
        assert_eq!(enter_result("   ", 0), None);
        assert_eq!(enter_result("just text.", 0), None);
    }

    #[test]
    fn test_enter_mid_line_prefixes_moved_text() {
        let after = "b. one\ntwo";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().continue_list(&doc, 6, 7).unwrap();
        assert_eq!(batch.apply_to(after), "b. one\nc. two");
        assert_eq!(batch.cursor, Some(10));
    }

    #[test]
    fn test_double_enter_removes_dangling_marker() {
        let after = "1. first\n3. \n";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().continue_list(&doc, 12, 13).unwrap();
        assert_eq!(batch.apply_to(after), "1. first\n");
        assert_eq!(batch.cursor, Some(9));
    }

    #[test]
    fn test_double_enter_needs_blank_next_line() {
        let after = "(c) \nmoved";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().continue_list(&doc, 4, 5).unwrap();
        assert_eq!(batch.apply_to(after), "(c) \n(d) moved");
    }

    #[test]
    fn test_merge_renumbers_from_previous_item() {
        // "1. first\n2. \n3. third\n4. fourth\nend" with "\n2. " deleted
        let after = "1. first\n3. third\n4. fourth\nend";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().renumber_after_merge(&doc, 8, "\n2. ").unwrap();
        assert_snapshot!(batch.apply_to(after), @r"
        1. first
        2. third
        3. fourth
        end
        ");
        assert_eq!(batch.cursor, Some(8));
    }

    #[test]
    fn test_merge_restarts_after_non_list_line() {
        let after = "intro\nb) two\nc) three";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().renumber_after_merge(&doc, 5, "\na) one").unwrap();
        assert_eq!(batch.apply_to(after), "intro\na) two\nb) three");
    }

    #[test]
    fn test_merge_blank_line_without_newline_restarts() {
        // "II. one" cleared to an empty line, splitting the run
        let after = "I. zero\n\nIII. two\nIV. three";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().renumber_after_merge(&doc, 8, "II. one").unwrap();
        assert_eq!(batch.apply_to(after), "I. zero\n\nI. two\nII. three");
    }

    #[test]
    fn test_merge_ignores_in_line_deletion() {
        let after = "1. frst\n3. next";
        let doc = TextSnapshot::new(after);
        assert_eq!(Synthesizer::new().renumber_after_merge(&doc, 4, "i"), None);
    }

    #[test]
    fn test_merge_run_stops_at_family_change() {
        let after = "1. a\n3. b\nc. other\n9. tail";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().renumber_after_merge(&doc, 4, "\n2. x").unwrap();
        assert_eq!(batch.apply_to(after), "1. a\n2. b\nc. other\n9. tail");
    }

    #[test]
    fn test_merge_keeps_each_line_style() {
        let after = "(1) a\n3. b\n(4) c";
        let doc = TextSnapshot::new(after);
        let batch = Synthesizer::new().renumber_after_merge(&doc, 5, "\n(2) x").unwrap();
        assert_eq!(batch.apply_to(after), "(1) a\n2. b\n(3) c");
    }

    #[test]
    fn test_renumber_correct_run_is_idempotent() {
        let text = "a. one\nb. two\nc. three";
        let doc = TextSnapshot::new(text);
        let synth = Synthesizer::new();
        assert!(synth.renumber_run(&doc, 0, MarkerFamily::LowercaseLetter, 1).is_empty());
        assert_eq!(synth.renumber_after_merge(&doc, 6, "\nx"), None);
    }

    #[test]
    fn test_enter_after_largest_ordinal_does_nothing() {
        let after = "(4294967295) x\n";
        let doc = TextSnapshot::new(after);
        assert_eq!(Synthesizer::new().continue_list(&doc, 14, 15), None);

        let (text, _) = enter_result("(4294967294) x", 0).unwrap();
        assert_eq!(text, "(4294967294) x\n(4294967295) ");
    }

    #[test]
    fn test_merge_after_largest_ordinal_does_nothing() {
        let after = "4294967295. a\n1. b";
        let doc = TextSnapshot::new(after);
        assert_eq!(Synthesizer::new().renumber_after_merge(&doc, 13, "\nx"), None);
    }

    #[test]
    fn test_renumber_run_stops_at_largest_ordinal() {
        let text = "(1) a\n(2) b\n(3) c";
        let doc = TextSnapshot::new(text);
        let edits = Synthesizer::new().renumber_run(&doc, 0, MarkerFamily::Arabic, u32::MAX - 1);
        assert_eq!(
            edits,
            vec![
                EditOp::replace(0, 3, "(4294967294)"),
                EditOp::replace(6, 9, "(4294967295)"),
            ]
        );
    }

    #[test]
    fn test_family_filter() {
        let synth = Synthesizer::with_families(&[MarkerFamily::ChineseNumeral]);
        let after = "(a) foo\n";
        let doc = TextSnapshot::new(after);
        assert_eq!(synth.continue_list(&doc, 7, 8), None);
        assert_eq!(synth.families(), &[MarkerFamily::ChineseNumeral]);
    }
}
