use std::path::PathBuf;

use cityline::{DrawCmd, FeatureRecord};

#[test]
fn cli_frame_writes_draw_commands() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();

    let features_path = dir.join("features.json");
    let out_path = dir.join("frame.json");
    let _ = std::fs::remove_file(&out_path);

    let features = vec![
        FeatureRecord {
            group: Some("Office".to_string()),
            chart_area: Some(20_000_000.0),
            visible_from: Some(1985),
            visible_to: Some(0),
        },
        FeatureRecord {
            group: Some("Residential".to_string()),
            chart_area: Some(9_000_000.0),
            visible_from: Some(1995),
            visible_to: Some(0),
        },
    ];
    let f = std::fs::File::create(&features_path).unwrap();
    serde_json::to_writer_pretty(f, &features).unwrap();

    let exe = std::env::var_os("CARGO_BIN_EXE_cityline")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "cityline.exe"
            } else {
                "cityline"
            });
            p
        });

    let in_arg = features_path.to_string_lossy().to_string();
    let out_arg = out_path.to_string_lossy().to_string();

    let status = std::process::Command::new(exe)
        .args([
            "frame",
            "--in",
            in_arg.as_str(),
            "--frame",
            "1800",
            "--seed",
            "7",
            "--out",
        ])
        .arg(out_arg.as_str())
        .status()
        .unwrap();

    assert!(status.success());
    assert!(out_path.exists());

    let json = std::fs::read_to_string(&out_path).unwrap();
    let cmds: Vec<DrawCmd> = serde_json::from_str(&json).unwrap();
    assert!(matches!(cmds[0], DrawCmd::Clear { .. }));
    assert!(cmds.iter().any(|c| matches!(c, DrawCmd::Polyline { .. })));
}
