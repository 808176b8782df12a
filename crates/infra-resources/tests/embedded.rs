use infra_resources::{embedded_bundle, EmbeddedBundle, ResourceLoader};
use infra_sdk::TempFile;
use std::fs;
use std::io::Read;

const BUNDLE: &str = "Infra.Resources.Tests";

fn bundle() -> EmbeddedBundle {
    embedded_bundle!(BUNDLE;
        "Samples/testfile.txt" => include_bytes!("fixtures/Samples/testfile.txt"),
    )
}

fn loader() -> ResourceLoader {
    ResourceLoader::new().with_bundle(bundle())
}

#[test]
fn macro_registers_normalized_names() {
    let names: Vec<String> = bundle().resource_names().map(str::to_string).collect();
    assert_eq!(names, vec!["Infra.Resources.Tests.Samples.testfile.txt".to_string()]);
}

#[test]
fn slash_and_dot_paths_return_identical_bytes() {
    let loader = loader();
    let slash = loader.read_bytes(BUNDLE, "Samples/testfile.txt").unwrap();
    let dot = loader.read_bytes(BUNDLE, "Samples.testfile.txt").unwrap();
    assert_eq!(slash, dot);
}

#[test]
fn read_text_of_sample() {
    assert_eq!(loader().read_text(BUNDLE, "Samples.testfile.txt").unwrap(), "12345");
}

#[test]
fn stream_of_sample() {
    let mut stream = loader().open(BUNDLE, "Samples\\testfile.txt").unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    assert_eq!(buf, b"12345");
}

#[test]
fn missing_and_empty_paths() {
    let loader = loader();
    assert!(loader.read_bytes(BUNDLE, "Samples/absent.txt").unwrap_err().is_not_found());
    assert!(loader.read_bytes(BUNDLE, "").unwrap_err().is_invalid_argument());
}

#[test]
fn extract_sample_into_temp_file() {
    let mut tmp = TempFile::create_empty("txt", None).unwrap();
    loader()
        .extract_to_file(BUNDLE, "Samples.testfile.txt", tmp.path())
        .unwrap();
    assert_eq!(fs::read_to_string(tmp.path()).unwrap(), "12345");

    let path = tmp.path().to_path_buf();
    tmp.release().unwrap();
    assert!(!path.exists());
}
