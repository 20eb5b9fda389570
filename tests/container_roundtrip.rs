use allsky_frames::{
    config::{Config, SequenceOrder},
    container::{ContainerReader, HEADER_LEN},
    timestamp::parse_directory_date,
    ContainerWriter, TimestampDeriver, Warning,
};
use chrono::NaiveDate;
use rand::Rng;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FRAME_BYTES: usize = 1024 * 768 * 2;

fn write_night(tmp: &TempDir, names: &[&str]) -> (PathBuf, Vec<Vec<u8>>) {
    let dir = tmp.path().join("20230615");
    fs::create_dir(&dir).unwrap();

    let mut rng = rand::thread_rng();
    let payloads: Vec<Vec<u8>> = names
        .iter()
        .map(|name| {
            let payload: Vec<u8> = (0..FRAME_BYTES).map(|_| rng.gen()).collect();
            fs::write(dir.join(name), &payload).unwrap();
            payload
        })
        .collect();

    (dir, payloads)
}

#[test]
fn night_crossing_midnight_round_trips() {
    let tmp = TempDir::new().unwrap();
    let names = ["20_00_00_000.raw", "20_00_00_500.raw", "04_10_00_100.raw"];
    let (dir, payloads) = write_night(&tmp, &names);
    let output = tmp.path().join("20230615.rcd");

    let report = ContainerWriter::new(&Config::default())
        .unwrap()
        .write_container(&dir, &output)
        .unwrap();

    assert_eq!(report.frames_written, 3);
    assert_eq!(report.output_size, (3 * (HEADER_LEN + FRAME_BYTES)) as u64);
    assert_eq!(fs::metadata(&output).unwrap().len(), report.output_size);

    let deriver = TimestampDeriver::default();
    let date = parse_directory_date("20230615").unwrap();
    let frames: Vec<_> = ContainerReader::open(&output)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(frames.len(), 3);
    for (i, frame) in frames.iter().enumerate() {
        let expected = deriver.derive(names[i], date).unwrap();
        assert_eq!(frame.header.sequence_index, i as u32);
        assert_eq!(frame.header.timestamp, expected.unix_epoch_seconds as u32);
        assert_eq!((frame.header.width, frame.header.height), (1024, 768));
        assert_eq!(frame.header.bit_depth, 16);
        assert_eq!(frame.header.frame_count, 1);
        assert_eq!(frame.payload, payloads[i]);
    }

    let dates: Vec<&str> = report.records.iter().map(|r| r.calendar_date.as_str()).collect();
    assert_eq!(dates, vec!["2023-06-15", "2023-06-15", "2023-06-16"]);
    assert_eq!(
        deriver.derive(names[2], date).unwrap().calendar_date,
        NaiveDate::from_ymd_opt(2023, 6, 16).unwrap()
    );
    assert_eq!(frames[2].header.timestamp, 1_686_888_600);

    let decoded = frames[0].decode().unwrap();
    assert_eq!(
        decoded.pixels.sample(1, 0),
        Some(u16::from_le_bytes([payloads[0][2], payloads[0][3]]))
    );
}

#[test]
fn listing_order_matches_directory_enumeration() {
    let tmp = TempDir::new().unwrap();
    let names = ["20_00_00_000.raw", "20_00_00_500.raw", "04_10_00_100.raw"];
    let (dir, _) = write_night(&tmp, &names);
    let listed: Vec<String> = fs::read_dir(&dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();

    let mut config = Config::default();
    config.output.order = SequenceOrder::Listing;
    let report = ContainerWriter::new(&config)
        .unwrap()
        .write_container(&dir, &tmp.path().join("night.rcd"))
        .unwrap();

    let written: Vec<(u32, String)> = report
        .records
        .into_iter()
        .map(|r| (r.sequence_index, r.filename))
        .collect();
    let expected: Vec<(u32, String)> = (0u32..).zip(listed).collect();
    assert_eq!(written, expected);
}

#[test]
fn rewriting_replaces_previous_container() {
    let tmp = TempDir::new().unwrap();
    let (dir, _) = write_night(&tmp, &["21_30_00_000.raw"]);
    let output = tmp.path().join("night.rcd");
    let writer = ContainerWriter::new(&Config::default()).unwrap();

    let first = writer.write_container(&dir, &output).unwrap();
    assert!(first.warnings.is_empty());
    let before = fs::read(&output).unwrap();

    let second = writer.write_container(&dir, &output).unwrap();
    assert_eq!(second.warnings, vec![Warning::DestructiveOverwrite(output.clone())]);
    assert_eq!(fs::read(&output).unwrap(), before);
}
