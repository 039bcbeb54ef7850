#[cfg(test)]
mod tests {
    use crate::probe::speed::{parse_report, SpeedReport, UNAVAILABLE};
    use crate::probe::system::{parse_df_output, parse_free_output};

    const FREE_OUTPUT: &str = "\
               total        used        free      shared  buff/cache   available
Mem:           7.8Gi       2.1Gi       3.2Gi       128Mi       2.4Gi       5.3Gi
Swap:          2.0Gi          0B       2.0Gi
";

    const DF_OUTPUT: &str = "\
Filesystem      Size  Used Avail Use% Mounted on
/dev/sda1        40G   12G   26G  32% /
";

    #[test]
    fn free_output_yields_used_over_total() {
        assert_eq!(
            parse_free_output(FREE_OUTPUT),
            Some("2.1Gi/7.8Gi".to_string())
        );
    }

    #[test]
    fn df_output_yields_used_over_total() {
        assert_eq!(parse_df_output(DF_OUTPUT), Some("12G/40G".to_string()));
    }

    #[test]
    fn truncated_stat_output_degrades_to_none() {
        assert_eq!(parse_free_output(""), None);
        assert_eq!(parse_free_output("total used\n"), None);
        assert_eq!(parse_df_output("Filesystem Size\n"), None);
        assert_eq!(parse_df_output("Filesystem Size\n/dev/sda1\n"), None);
    }

    #[test]
    fn speed_json_output_is_parsed() {
        let stdout = r#"{"ping": 23.4, "download": 94200000.0, "upload": 11000000.0}"#;
        let report = parse_report(stdout);
        assert_eq!(report.ping_ms, "23.4");
        assert_eq!(report.download_mbps, "94.2");
        assert_eq!(report.upload_mbps, "11.0");
    }

    #[test]
    fn partial_speed_json_degrades_per_field() {
        let report = parse_report(r#"{"ping": 5.0}"#);
        assert_eq!(report.ping_ms, "5.0");
        assert_eq!(report.download_mbps, UNAVAILABLE);
        assert_eq!(report.upload_mbps, UNAVAILABLE);
    }

    #[test]
    fn speed_text_output_is_the_fallback() {
        let stdout = "Ping: 23.4 ms\nDownload: 93.2 Mbit/s\nUpload: 11.0 Mbit/s\n";
        let report = parse_report(stdout);
        assert_eq!(report.ping_ms, "23.4");
        assert_eq!(report.download_mbps, "93.2");
        assert_eq!(report.upload_mbps, "11.0");
    }

    #[test]
    fn malformed_speed_output_yields_all_placeholders() {
        assert_eq!(parse_report(""), SpeedReport::unavailable());
        assert_eq!(
            parse_report("ERROR: Cannot retrieve speedtest configuration"),
            SpeedReport::unavailable()
        );
        assert_eq!(
            parse_report("Ping: fast\nDownload: lots\n"),
            SpeedReport::unavailable()
        );
    }

    #[test]
    fn unavailable_report_renders_placeholders() {
        let rendered = SpeedReport::unavailable().render();
        assert!(rendered.contains("N/A"));
        assert!(rendered.contains("Ping"));
    }
}
