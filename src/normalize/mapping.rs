use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Leading rows of every sheet holding title/metadata, skipped before the
/// header row is read.
pub const HEADER_SKIP_ROWS: usize = 8;

/// Hard cap on data rows read from a single sheet; rows beyond it are
/// silently dropped.
pub const SHEET_ROW_CAP: usize = 273;

/// Name of the tag column added so each row carries its originating sheet
/// through concatenation. Not part of the canonical schema, so the final
/// projection drops it again.
pub const SHEET_TAG_COLUMN: &str = "sheet_name";

/// Position → canonical name for header cells the source leaves unlabeled.
/// Positions 1–3 are expected to already read DD/MM/YY in the source header.
pub static POSITIONAL_COLUMNS: Lazy<HashMap<usize, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (0, "no"),
        (4, "week"),
        (5, "shift"),
        (6, "line"),
        (7, "model"),
        (8, "part_name"),
        (9, "part_no"),
        (10, "customer"),
        (11, "description_of_problem"),
        (12, "problem_category"),
        (13, "suplier_or_responsible"),
        (14, "4m_factor"),
        (15, "dop_repair"),
        (16, "dop_scrap"),
        (17, "dop_total"),
    ])
});

/// Resolve the effective name of a header cell: a labeled cell keeps its
/// own label, an unlabeled cell at a mapped position takes the canonical
/// name, anything else gets a placeholder the projection drops.
pub fn resolve_header(position: usize, label: &str) -> String {
    let label = label.trim();
    if !label.is_empty() {
        return label.to_string();
    }
    match POSITIONAL_COLUMNS.get(&position) {
        Some(name) => (*name).to_string(),
        None => format!("unnamed_{position}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_cells_keep_their_label() {
        assert_eq!(resolve_header(1, "DD"), "DD");
        assert_eq!(resolve_header(4, "custom"), "custom");
    }

    #[test]
    fn unlabeled_mapped_positions_get_canonical_names() {
        assert_eq!(resolve_header(0, ""), "no");
        assert_eq!(resolve_header(4, "  "), "week");
        assert_eq!(resolve_header(14, ""), "4m_factor");
        assert_eq!(resolve_header(17, ""), "dop_total");
    }

    #[test]
    fn unlabeled_unmapped_positions_get_placeholders() {
        assert_eq!(resolve_header(2, ""), "unnamed_2");
        assert_eq!(resolve_header(18, ""), "unnamed_18");
    }
}
