use crate::data::model::{FilenameFields, Probe, TIF_EXTENSION};

// ---------------------------------------------------------------------------
// Code tables
// ---------------------------------------------------------------------------

/// Display string for a timepoint code, if known.
pub fn timepoint_label(code: &str) -> Option<&'static str> {
    match code {
        "t1" => Some("1 hr"),
        "t2" => Some("2 hrs"),
        "t3" => Some("3 hrs"),
        _ => None,
    }
}

/// Display string for a metabolite code under `probe`, if known.
pub fn metabolite_label(probe: Probe, code: &str) -> Option<&'static str> {
    match (probe, code) {
        (Probe::P1, "m1") => Some("3FDGlucose"),
        (Probe::P1, "m3") => Some("3FDGluconic Acid"),
        (Probe::P1, "m4") => Some("3FDSorbitol"),
        (Probe::P2, "m1") => Some("3FDGalactose"),
        (Probe::P2, "m3") => Some("3FDGalactonic Acid"),
        (Probe::P2, "m4") => Some("3FDGalactitol"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Title
// ---------------------------------------------------------------------------

/// Turn `712_x_t2_m1.tif` into `3FDGlucose - 2 hrs`.
///
/// Names with fewer than four underscore segments come back unchanged,
/// extension included. Unknown codes are shown verbatim.
pub fn format_title(file_name: &str, probe: Probe) -> String {
    let stem = file_name.replace(TIF_EXTENSION, "");
    let Some(fields) = FilenameFields::parse(&stem) else {
        return file_name.to_string();
    };

    let time = timepoint_label(fields.time_code).unwrap_or(fields.time_code);
    let metabolite =
        metabolite_label(probe, fields.metabolite_code).unwrap_or(fields.metabolite_code);

    format!("{metabolite} - {time}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn p1_title() {
        assert_eq!(format_title("712_x_t2_m1.tif", Probe::P1), "3FDGlucose - 2 hrs");
    }

    #[test]
    fn p2_title() {
        assert_eq!(format_title("711_x_t1_m4.tif", Probe::P2), "3FDGalactitol - 1 hr");
        assert_eq!(
            format_title("711_x_t3_m3.tif", Probe::P2),
            "3FDGalactonic Acid - 3 hrs"
        );
    }

    #[test]
    fn short_name_is_returned_with_extension() {
        assert_eq!(format_title("oddname.tif", Probe::P1), "oddname.tif");
        assert_eq!(format_title("712_x_t1.tif", Probe::P1), "712_x_t1.tif");
    }

    #[test]
    fn unknown_codes_fall_back_to_raw_segments() {
        assert_eq!(format_title("712_x_t9_m9.tif", Probe::P1), "m9 - t9");
        assert_eq!(format_title("712_x_t1_m2.tif", Probe::P1), "m2 - 1 hr");
    }

    #[test]
    fn metabolite_table_depends_on_probe() {
        assert_eq!(format_title("712_x_t1_m1.tif", Probe::P2), "3FDGalactose - 1 hr");
    }

    #[test]
    fn extra_segments_are_ignored() {
        assert_eq!(
            format_title("712_x_t3_m4_rep2.tif", Probe::P1),
            "3FDSorbitol - 3 hrs"
        );
    }
}
