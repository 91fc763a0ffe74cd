use super::*;
use crate::foundation::config::OutputFormat;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "stkr_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn output(bytes: &[u8]) -> ExportOutput {
    ExportOutput {
        bytes: bytes.to_vec(),
        width: 1,
        height: 1,
        format: OutputFormat::Jpeg,
    }
}

#[test]
fn in_memory_sink_keeps_arrival_order() {
    let mut sink = InMemorySink::new();
    sink.persist(&output(b"a")).unwrap();
    sink.persist(&output(b"b")).unwrap();
    let got: Vec<&[u8]> = sink.outputs().iter().map(|o| o.bytes.as_slice()).collect();
    assert_eq!(got, vec![b"a".as_slice(), b"b".as_slice()]);
}

#[test]
fn file_sink_writes_unique_files_without_leftover_temps() {
    let tmp = temp_dir("file_sink");
    let mut sink = FileSink::new(&tmp, "stack");
    sink.persist(&output(b"one")).unwrap();
    sink.persist(&output(b"two")).unwrap();

    assert_eq!(sink.written().len(), 2);
    assert_eq!(std::fs::read(&sink.written()[0]).unwrap(), b"one");
    assert_eq!(std::fs::read(&sink.written()[1]).unwrap(), b"two");
    assert!(sink.written()[0].to_string_lossy().ends_with("stack-1.jpg"));

    let entries: Vec<_> = std::fs::read_dir(&tmp)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(entries.iter().all(|n| !n.ends_with(".tmp")));
    assert_eq!(entries.len(), 2);

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn file_sink_skips_existing_names() {
    let tmp = temp_dir("file_sink_existing");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("stack-1.jpg"), b"old").unwrap();

    let mut sink = FileSink::new(&tmp, "stack");
    sink.persist(&output(b"new")).unwrap();
    assert!(sink.written()[0].to_string_lossy().ends_with("stack-2.jpg"));
    assert_eq!(std::fs::read(tmp.join("stack-1.jpg")).unwrap(), b"old");

    std::fs::remove_dir_all(&tmp).ok();
}
