#![cfg(all(feature = "hdf5", feature = "adios2"))]

use iocompare::backend::adios2::Adios2Backend;
use iocompare::backend::hdf5::Hdf5Backend;
use iocompare::backend::{create_backends, StorageBackend};
use iocompare::bench::{DatasetGenerator, Harness, HarnessState};
use iocompare::config::BenchConfig;
use iocompare::models::{Dataset, Shape};
use iocompare::IoCompareError;
use tempfile::tempdir;

#[test]
fn test_hdf5_output_is_not_read_as_stream() {
    let dir = tempdir().unwrap();
    let shape = Shape::new(2, 2);
    let path = dir.path().join("shared_hdf5.h5");

    Hdf5Backend::new(&path, shape)
        .write(&Dataset::from_vec(shape, vec![1, 2, 3, 4]).unwrap())
        .unwrap();

    // The stream reader looks for its own artifact name.
    let mut reader = Adios2Backend::new(dir.path().join("shared_adios2.bp"), shape);
    let err = reader.read().unwrap_err();
    assert!(matches!(err, IoCompareError::NotFound { .. }));
}

#[test]
fn test_stream_output_is_not_read_as_hdf5() {
    let dir = tempdir().unwrap();
    let shape = Shape::new(2, 2);
    let stream = dir.path().join("shared_adios2.bp");

    Adios2Backend::new(&stream, shape)
        .write(&Dataset::from_vec(shape, vec![1, 2, 3, 4]).unwrap())
        .unwrap();

    // Pointing the file backend at the stream directory must not yield data.
    let mut reader = Hdf5Backend::new(&stream, shape);
    assert!(reader.read().is_err());
}

#[test]
fn test_full_benchmark_run() {
    let dir = tempdir().unwrap();
    let config = BenchConfig::new()
        .with_shape(Shape::new(100, 100))
        .with_output_dir(dir.path());

    let backends = create_backends(&config).unwrap();
    let mut harness = Harness::new(config.clone(), backends).unwrap();
    let mut out = Vec::new();
    let report = harness
        .run(&mut DatasetGenerator::from_seed(4), &mut out)
        .unwrap();

    assert_eq!(harness.state(), HarnessState::Done);
    assert_eq!(report.results.len(), 4);

    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Dataset size: 100 x 100");
    assert_eq!(lines[1], "Writing HDF5...");
    assert_eq!(lines[3], "Writing ADIOS 2...");
    assert_eq!(lines[5], "Reading HDF5...");
    assert_eq!(lines[7], "Reading ADIOS 2...");
    assert!(dir.path().join("data_comparison_hdf5.h5").exists());
    assert!(dir.path().join("data_comparison_adios2.bp").exists());
}
