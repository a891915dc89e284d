//! Corpus loading and round-robin iteration over files on disk.

use std::path::Path;

use gridtask::core::types::GridPos;
use gridtask::core::Error;
use gridtask::generation::{
    DatasetConfig, DatasetFigureGenerator, GroundTruthPredictor, TargetCorpus,
};
use gridtask::grid::VoxelGrid;
use gridtask::FigureOrigin;

fn target(i: usize) -> VoxelGrid {
    let mut grid = VoxelGrid::new();
    let (x, y) = (i % 10, (i / 10) % 10);
    for z in 0..1 + i % 4 {
        grid.set(GridPos::new(z, x, y), 1 + (i % 6) as i32);
    }
    grid
}

fn write_corpus(dir: &Path, len: usize) -> DatasetConfig {
    gridtask::core::logging::try_init();
    let config = DatasetConfig::in_dir(dir);
    let targets: Vec<VoxelGrid> = (0..len).map(target).collect();
    let names: Vec<String> = (0..len).map(|i| format!("structure_{:03}", i)).collect();
    let chats: Vec<Vec<String>> = (0..len)
        .map(|i| vec!["<Architect>".to_string(), format!("build tower {}", i)])
        .collect();
    std::fs::write(&config.targets_path, serde_json::to_string(&targets).unwrap()).unwrap();
    std::fs::write(&config.names_path, serde_json::to_string(&names).unwrap()).unwrap();
    std::fs::write(&config.instructions_path, serde_json::to_string(&chats).unwrap()).unwrap();
    config
}

fn index_of(origin: &FigureOrigin) -> usize {
    match origin {
        FigureOrigin::DatasetDriven { index } => *index,
        other => panic!("unexpected origin {:?}", other),
    }
}

#[test]
fn test_load_truncates_to_cap() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_corpus(dir.path(), 320);
    let corpus = TargetCorpus::load(&config).unwrap();
    assert_eq!(corpus.len(), 300);
    assert_eq!(corpus.name(299).unwrap(), "structure_299");
    assert!(corpus.name(300).is_err());
}

#[test]
fn test_round_robin_wraps_after_full_corpus() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_corpus(dir.path(), 300);
    let corpus = TargetCorpus::load(&config).unwrap();
    let predictor = GroundTruthPredictor::from_corpus(&corpus);
    let generator = DatasetFigureGenerator::new(corpus, predictor);

    let mut cursor = generator.figures_generator(true);
    let first = cursor.next().unwrap().unwrap();
    let item_301 = cursor.nth(299).unwrap().unwrap();
    assert_eq!(cursor.calls(), 301);
    assert_eq!(index_of(item_301.0.origin()), 0);
    assert_eq!(item_301.1, first.1);
    assert_eq!(item_301.0.occupancy(), first.0.occupancy());
    assert_eq!(item_301.0.params().right_predicted, Some(true));
}

#[test]
fn test_make_task_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_corpus(dir.path(), 5);
    config.use_dialogue = false;
    let predictor = GroundTruthPredictor::default();
    let mut generator = DatasetFigureGenerator::from_config(&config, predictor).unwrap();
    let indices: Vec<_> = (0..7).map(|_| index_of(generator.make_task().unwrap().origin())).collect();
    assert_eq!(indices, vec![0, 1, 2, 3, 4, 0, 1]);
}

#[test]
fn test_main_figure_out_of_range_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = write_corpus(dir.path(), 5);
    config.main_figure = Some(9);
    let result = DatasetFigureGenerator::from_config(&config, GroundTruthPredictor::default());
    assert!(matches!(result, Err(Error::DataLoad(_))));
}

#[test]
fn test_missing_file_is_data_load_error() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatasetConfig::in_dir(dir.path());
    assert!(matches!(TargetCorpus::load(&config), Err(Error::DataLoad(_))));
}

#[test]
fn test_misaligned_files_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_corpus(dir.path(), 4);
    std::fs::write(&config.names_path, r#"["only", "three", "names"]"#).unwrap();
    assert!(matches!(TargetCorpus::load(&config), Err(Error::DataLoad(_))));
}

#[test]
fn test_malformed_target_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_corpus(dir.path(), 2);
    std::fs::write(&config.targets_path, "[[[1, 2]], [[3]]]").unwrap();
    assert!(matches!(TargetCorpus::load(&config), Err(Error::DataLoad(_))));
}
