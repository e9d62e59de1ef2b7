/// Stock count the storefront records for each source availability label.
const AVAILABILITY_QUANTITIES: &[(&str, u32)] = &[
    ("在庫あり", 10),
    ("在庫なし", 0),
    ("残り僅か", 3),
    ("予約商品", 5),
    ("残りわずか", 2),
    ("残り1点", 1),
    ("残り2点", 2),
    ("残り3点", 3),
    ("残り4点", 4),
    ("残り5点", 5),
    ("取り寄せ", 5),
    ("予約", 7),
    ("予約可能", 7),
];

/// Maps an availability label to a stock quantity. Unknown labels map to 0.
#[must_use]
pub fn availability_quantity(label: &str) -> u32 {
    let label = label.trim();
    AVAILABILITY_QUANTITIES
        .iter()
        .find(|(known, _)| *known == label)
        .map_or(0, |&(_, qty)| qty)
}
