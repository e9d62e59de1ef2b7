//! Color label → short color code table used in derived SKUs.
//!
//! The table is keyed by the source site's raw (Japanese) display labels.
//! Lookup is exact: a label that is not in the table resolves to
//! [`UNKNOWN_COLOR_CODE`], so every unmapped color shares one bucket.

/// Code returned for any label not present in [`COLOR_CODES`].
pub const UNKNOWN_COLOR_CODE: &str = "UNK";

/// Known color labels and their SKU codes.
///
/// Family labels (`…系`, `…系1`) get numbered codes so that a product offered in
/// both "black" and "black-ish" keeps distinct SKUs.
pub const COLOR_CODES: &[(&str, &str)] = &[
    ("ブラック", "BLK"),
    ("ブラック系", "BLK1"),
    ("ブラック系1", "BLK2"),
    ("ホワイト", "WHT"),
    ("ホワイト系", "WHT1"),
    ("ホワイト系1", "WHT2"),
    ("グレー", "GRY"),
    ("グレー系", "GRY1"),
    ("グレー系1", "GRY2"),
    ("ネイビー", "NVY"),
    ("ネイビー系", "NVY1"),
    ("ネイビー系1", "NVY2"),
    ("ブルー", "BLU"),
    ("ブルー系", "BLU1"),
    ("ブルー系1", "BLU2"),
    ("ブラウン", "BRN"),
    ("ブラウン系", "BRN1"),
    ("ブラウン系1", "BRN2"),
    ("ベージュ", "BEI"),
    ("ベージュ系", "BEI1"),
    ("ベージュ系1", "BEI2"),
    ("レッド", "RED"),
    ("レッド系", "RED1"),
    ("レッド系1", "RED2"),
    ("ピンク", "PNK"),
    ("ピンク系", "PNK1"),
    ("ピンク系1", "PNK2"),
    ("グリーン", "GRN"),
    ("グリーン系", "GRN1"),
    ("グリーン系1", "GRN2"),
    ("イエロー", "YEL"),
    ("イエロー系", "YEL1"),
    ("イエロー系1", "YEL2"),
    ("パープル", "PUR"),
    ("パープル系", "PUR1"),
    ("パープル系1", "PUR2"),
    ("オレンジ", "ORG"),
    ("オレンジ系", "ORG1"),
    ("オレンジ系1", "ORG2"),
    ("カーキ", "KHA"),
    ("カーキ系", "KHA1"),
    ("カーキ系1", "KHA2"),
    ("チャコール", "CHC"),
    ("ライトブルー", "LBL"),
    ("オリーブ", "OLV"),
    ("ダークグリーン", "DGN"),
    ("マスタード", "MUS"),
    ("ワイン", "WIN"),
    ("アイボリー", "IVY"),
    ("シルバー", "SLV"),
    ("ゴールド", "GLD"),
    ("ミント", "MNT"),
    ("サックス", "SAX"),
    ("モカ", "MOC"),
    ("テラコッタ", "TER"),
    ("ラベンダー", "LAV"),
    ("スモーキーピンク", "SPK"),
    ("スモーキーブルー", "SBL"),
    ("スモーキーグリーン", "SGN"),
    ("杢グレー", "GRY"),
    ("スミクロ", "SBLK"),
    ("ライトベージュ", "LTB"),
    ("オートミール", "OT"),
    ("アッシュブラウン", "ATB"),
    ("グレイッシュベージュ", "GRYB"),
    ("グレイッシュブルー", "GRYBU"),
];

/// Returns the SKU color code for a raw color label.
///
/// Exact, case-sensitive match only. Unmapped labels are logged and resolve
/// to [`UNKNOWN_COLOR_CODE`].
#[must_use]
pub fn normalize_color(color_label: &str) -> &'static str {
    if let Some(code) = lookup_color_code(color_label) {
        return code;
    }
    tracing::warn!(
        color = color_label,
        code = UNKNOWN_COLOR_CODE,
        "unmapped color label"
    );
    UNKNOWN_COLOR_CODE
}

/// Table lookup without the unknown-color fallback.
#[must_use]
pub fn lookup_color_code(color_label: &str) -> Option<&'static str> {
    COLOR_CODES
        .iter()
        .find(|(label, _)| *label == color_label)
        .map(|(_, code)| *code)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn known_label_maps_to_code() {
        assert_eq!(normalize_color("ブラック"), "BLK");
        assert_eq!(normalize_color("グレイッシュブルー"), "GRYBU");
        assert_eq!(normalize_color("オートミール"), "OT");
    }

    #[test]
    fn family_labels_get_numbered_codes() {
        assert_eq!(normalize_color("ネイビー系"), "NVY1");
        assert_eq!(normalize_color("ネイビー系1"), "NVY2");
    }

    #[test]
    fn unknown_label_falls_back_to_unk() {
        assert_eq!(normalize_color("未知色"), "UNK");
    }

    #[test]
    fn unknown_label_is_not_abbreviated() {
        // No prefix/suffix heuristics: a family suffix on an unmapped base stays UNK.
        assert_eq!(normalize_color("ターコイズ系"), "UNK");
        assert_eq!(normalize_color("ブラック "), "UNK");
        assert_eq!(normalize_color(""), "UNK");
    }

    #[test]
    fn table_has_no_duplicate_labels() {
        let mut seen = HashSet::new();
        for (label, _) in COLOR_CODES {
            assert!(seen.insert(*label), "duplicate color label {label}");
        }
    }

    #[test]
    fn every_code_is_two_to_six_uppercase_alphanumerics() {
        for (label, code) in COLOR_CODES {
            assert!(
                (2..=6).contains(&code.len())
                    && code
                        .chars()
                        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()),
                "bad code {code} for {label}"
            );
        }
    }
}
