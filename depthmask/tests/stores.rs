use std::fs;
use std::path::Path;

use depthmask::{Error, array, store};
use ndarray::array;

fn seed_image_folder(root: &Path) -> anyhow::Result<std::path::PathBuf> {
    let photos = root.join("photos");
    fs::create_dir(&photos)?;
    // Contents don't matter to the batch mechanics; inference is injected.
    for name in ["dog.JPG", "cat.png", "notes.txt", "bird.jpeg"] {
        fs::write(photos.join(name), b"")?;
    }
    Ok(photos)
}

#[test]
fn depth_store_derives_names_and_processes_in_sorted_order() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let photos = seed_image_folder(root.path())?;

    let mut seen = Vec::new();
    let written = store::depth::run_with(&photos, "MiDaS_small", |path| {
        seen.push(path.file_name().unwrap().to_string_lossy().into_owned());
        Ok(array![[1.0f32, 2.0]])
    })?;

    // Deterministic order, image extensions matched case-insensitively,
    // notes.txt skipped.
    assert_eq!(seen, vec!["bird.jpeg", "cat.png", "dog.JPG"]);

    let depth_dir = root.path().join("depth_maps_photos");
    assert_eq!(
        written,
        vec![
            depth_dir.join("depth_map_MiDaS_small_bird.jpeg.csv"),
            depth_dir.join("depth_map_MiDaS_small_cat.png.csv"),
            depth_dir.join("depth_map_MiDaS_small_dog.JPG.csv"),
        ]
    );
    assert_eq!(
        array::read(&depth_dir.join("depth_map_MiDaS_small_cat.png.csv"))?,
        array![[1.0f32, 2.0]]
    );
    Ok(())
}

#[test]
fn depth_store_requires_an_existing_folder() {
    let result = store::depth::run_with(Path::new("no_such_photos_anywhere"), "MiDaS_small", |_| {
        Ok(array![[1.0f32]])
    });
    assert!(matches!(result, Err(Error::FolderNotFound(_))));
}

#[test]
fn depth_store_aborts_on_the_first_failed_image() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let photos = seed_image_folder(root.path())?;

    let mut calls = 0;
    let result = store::depth::run_with(&photos, "MiDaS_small", |_| {
        calls += 1;
        Err(Error::InvalidInput("no depth for you".to_string()))
    });

    assert!(matches!(result, Err(Error::InvalidInput(_))));
    assert_eq!(calls, 1);
    assert!(
        !root
            .path()
            .join("depth_maps_photos/depth_map_MiDaS_small_bird.jpeg.csv")
            .exists()
    );
    Ok(())
}

fn seed_depth_folder(root: &Path) -> anyhow::Result<std::path::PathBuf> {
    let depth_dir = root.join("depth_maps_photos");
    fs::create_dir(&depth_dir)?;
    array::write(
        &depth_dir.join("depth_map_MiDaS_small_cat.png.csv"),
        &array![[1.0f32, 2.0], [3.0, 4.0]],
    )?;
    array::write(
        &depth_dir.join("depth_map_MiDaS_small_dog.jpg.csv"),
        &array![[10.0f32, 0.0]],
    )?;
    Ok(depth_dir)
}

#[test]
fn mask_store_writes_one_mask_per_depth_file() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let depth_dir = seed_depth_folder(root.path())?;

    let written = store::mask::run(&depth_dir, 0.5)?;

    let mask_dir = root.path().join("masks_photos");
    assert_eq!(
        written,
        vec![
            mask_dir.join("mask_cat.png.csv"),
            mask_dir.join("mask_dog.jpg.csv"),
        ]
    );
    assert_eq!(
        array::read(&mask_dir.join("mask_cat.png.csv"))?,
        array![[1.0f32, 0.0], [0.0, 0.0]]
    );
    assert_eq!(
        array::read(&mask_dir.join("mask_dog.jpg.csv"))?,
        array![[0.0f32, 1.0]]
    );
    Ok(())
}

#[test]
fn mask_store_reruns_cleanly_over_prior_output() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let depth_dir = seed_depth_folder(root.path())?;

    store::mask::run(&depth_dir, 0.5)?;
    store::mask::run(&depth_dir, 1.0)?;

    // Second run overwrote the first; only the exact peak stays near.
    assert_eq!(
        array::read(&root.path().join("masks_photos/mask_cat.png.csv"))?,
        array![[1.0f32, 1.0], [1.0, 0.0]]
    );
    Ok(())
}

#[test]
fn mask_store_ignores_files_without_a_csv_extension() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let depth_dir = seed_depth_folder(root.path())?;
    fs::write(depth_dir.join("notes.txt"), "not a depth map")?;

    let written = store::mask::run(&depth_dir, 0.5)?;
    assert_eq!(written.len(), 2);
    Ok(())
}

#[test]
fn mask_store_matches_extensions_case_insensitively() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let depth_dir = root.path().join("depth_maps_photos");
    fs::create_dir(&depth_dir)?;
    array::write(
        &depth_dir.join("depth_map_MiDaS_small_CAT.PNG.CSV"),
        &array![[1.0f32, 2.0]],
    )?;

    let written = store::mask::run(&depth_dir, 0.5)?;
    assert_eq!(written.len(), 1);
    Ok(())
}

#[test]
fn missing_depth_folder_is_reported() {
    let result = store::mask::run(Path::new("no_such_folder_anywhere"), 0.5);
    assert!(matches!(result, Err(Error::FolderNotFound(_))));
}

#[test]
fn malformed_depth_file_aborts_the_batch() -> anyhow::Result<()> {
    let root = tempfile::tempdir()?;
    let depth_dir = seed_depth_folder(root.path())?;
    // Sorts before the seeded files, so nothing after it gets processed.
    fs::write(
        depth_dir.join("depth_map_MiDaS_small_bad.png.csv"),
        "1,2\n3\n",
    )?;

    let result = store::mask::run(&depth_dir, 0.5);
    assert!(matches!(result, Err(Error::Parse { .. })));

    let mask_dir = root.path().join("masks_photos");
    assert!(!mask_dir.join("mask_cat.png.csv").exists());
    Ok(())
}
