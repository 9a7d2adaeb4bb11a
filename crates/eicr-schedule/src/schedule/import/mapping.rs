use crate::schedule::domain::FieldId;

/// Role a spreadsheet column plays on a schedule-of-tests export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnRole {
    Designation,
    Description,
    DeviceType,
    RcdRating,
    BsStandard,
    MaxZs,
    TestedOn,
    Reading(FieldId),
}

/// Normalize a header cell: strip a BOM, collapse whitespace, lowercase.
pub(crate) fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Map a normalized header to its column role. Unknown headers (cable size,
/// reference method, ...) are ignored rather than rejected.
pub(crate) fn column_role(normalized: &str) -> Option<ColumnRole> {
    match normalized {
        "circuit" | "circuit no" | "circuit number" | "designation" => {
            Some(ColumnRole::Designation)
        }
        "description" | "circuit description" => Some(ColumnRole::Description),
        "protective device" | "device type" | "device" => Some(ColumnRole::DeviceType),
        "rcd rating" | "rcd rating (ma)" => Some(ColumnRole::RcdRating),
        "bs standard" | "bs (en)" => Some(ColumnRole::BsStandard),
        "max zs" | "max zs (ω)" | "maximum zs" => Some(ColumnRole::MaxZs),
        "date tested" | "tested on" | "test date" => Some(ColumnRole::TestedOn),
        "r1+r2" | "r1 + r2" | "r1+r2 (ω)" | "continuity" => {
            Some(ColumnRole::Reading(FieldId::R1R2))
        }
        "zs" | "zs (ω)" => Some(ColumnRole::Reading(FieldId::Zs)),
        "ir live-earth" | "insulation live-earth" | "ir l-e" | "insulation l-e" => {
            Some(ColumnRole::Reading(FieldId::InsulationLiveEarth))
        }
        "ir live-neutral" | "insulation live-neutral" | "ir l-n" | "insulation l-n" => {
            Some(ColumnRole::Reading(FieldId::InsulationLiveNeutral))
        }
        "polarity" => Some(ColumnRole::Reading(FieldId::Polarity)),
        "rcd 1x" | "rcd @ 1x" | "rcd 1x (ms)" => Some(ColumnRole::Reading(FieldId::RcdOneX)),
        "rcd 5x" | "rcd @ 5x" | "rcd 5x (ms)" => Some(ColumnRole::Reading(FieldId::RcdFiveX)),
        "rcd test" | "rcd test button" => Some(ColumnRole::Reading(FieldId::RcdTestButton)),
        "afdd" | "afdd test" => Some(ColumnRole::Reading(FieldId::AfddTest)),
        "functional" | "functional testing" | "functional test" => {
            Some(ColumnRole::Reading(FieldId::FunctionalTesting))
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(raw_header: &str) -> Option<ColumnRole> {
    column_role(&normalize_header(raw_header))
}
