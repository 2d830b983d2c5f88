#![cfg(feature = "adios2")]

use iocompare::backend::adios2::Adios2Backend;
use iocompare::backend::StorageBackend;
use iocompare::bench::DatasetGenerator;
use iocompare::models::{Dataset, Shape};
use iocompare::IoCompareError;
use tempfile::tempdir;

#[test]
fn test_round_trip_full_grid() {
    let dir = tempdir().unwrap();
    let shape = Shape::new(1000, 1000);
    let mut backend = Adios2Backend::new(dir.path().join("grid_adios2.bp"), shape);

    let original = DatasetGenerator::from_seed(21).generate(shape);
    backend.write(&original).unwrap();
    let loaded = backend.read().unwrap();

    assert_eq!(loaded.shape(), shape);
    assert_eq!(loaded.first_difference(&original), None);
}

#[test]
fn test_shape_mismatch_on_read() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("small_adios2.bp");

    let mut writer = Adios2Backend::new(&path, Shape::new(2, 3));
    writer
        .write(&Dataset::from_vec(Shape::new(2, 3), vec![0; 6]).unwrap())
        .unwrap();

    let mut reader = Adios2Backend::new(&path, Shape::new(3, 2));
    let err = reader.read().unwrap_err();
    assert!(matches!(err, IoCompareError::ShapeMismatch { .. }));
}

#[test]
fn test_second_write_replaces_first() {
    let dir = tempdir().unwrap();
    let shape = Shape::new(4, 4);
    let mut backend = Adios2Backend::new(dir.path().join("rerun_adios2.bp"), shape);

    backend
        .write(&DatasetGenerator::from_seed(1).generate(shape))
        .unwrap();
    let second = DatasetGenerator::from_seed(2).generate(shape);
    backend.write(&second).unwrap();

    assert_eq!(backend.read().unwrap(), second);
}

#[test]
fn test_remove_output() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone_adios2.bp");
    let mut backend = Adios2Backend::new(&path, Shape::new(2, 2));

    backend.write(&Dataset::zeros(Shape::new(2, 2))).unwrap();
    assert!(path.exists());
    backend.remove_output().unwrap();
    assert!(!path.exists());
}
