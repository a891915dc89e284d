//! Corpus-driven figures.
//!
//! A corpus is three parallel sequences loaded once: voxel targets, target
//! names and the instruction (dialogue tokens) describing each target.
//! Figures are produced either from the ground truth directly or from an
//! injected [`TargetPredictor`] run on the instruction.

use std::collections::HashMap;
use std::path::Path;

use serde::de::DeserializeOwned;

use super::config::DatasetConfig;
use crate::core::error::Error;
use crate::core::types::Result;
use crate::figure::{Figure, FigureBuilder, FigureOrigin, FigureParams};
use crate::grid::VoxelGrid;

/// Text-to-structure capability. Blocking; may fail.
pub trait TargetPredictor {
    fn predict(&self, instruction: &[String]) -> Result<VoxelGrid>;
}

/// Adapts a closure into a [`TargetPredictor`].
pub struct FnPredictor<F>(pub F);

impl<F> TargetPredictor for FnPredictor<F>
where
    F: Fn(&[String]) -> Result<VoxelGrid>,
{
    fn predict(&self, instruction: &[String]) -> Result<VoxelGrid> {
        (self.0)(instruction)
    }
}

impl<P: TargetPredictor + ?Sized> TargetPredictor for Box<P> {
    fn predict(&self, instruction: &[String]) -> Result<VoxelGrid> {
        (**self).predict(instruction)
    }
}

/// Answers each corpus instruction with its ground-truth target.
///
/// Instructions are the only key the predictor sees, so when several entries
/// share an instruction the first entry's target answers for all of them and
/// the later entries are reported as mispredicted.
#[derive(Clone, Debug, Default)]
pub struct GroundTruthPredictor {
    targets: HashMap<Vec<String>, VoxelGrid>,
}

impl GroundTruthPredictor {
    pub fn from_corpus(corpus: &TargetCorpus) -> Self {
        let mut targets = HashMap::with_capacity(corpus.len());
        for (idx, (instruction, target)) in corpus.instructions.iter().zip(&corpus.targets).enumerate() {
            if targets.contains_key(instruction) {
                log::warn!(
                    "corpus entry {} repeats instruction {:?}; keeping the first target",
                    idx,
                    instruction
                );
                continue;
            }
            targets.insert(instruction.clone(), target.clone());
        }
        Self { targets }
    }

    /// Number of distinct instructions known.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl TargetPredictor for GroundTruthPredictor {
    fn predict(&self, instruction: &[String]) -> Result<VoxelGrid> {
        self.targets
            .get(instruction)
            .cloned()
            .ok_or_else(|| Error::Predictor(format!("no target for instruction {:?}", instruction)))
    }
}

/// Parallel (target, name, instruction) sequences.
#[derive(Clone, Debug)]
pub struct TargetCorpus {
    targets: Vec<VoxelGrid>,
    names: Vec<String>,
    instructions: Vec<Vec<String>>,
}

impl TargetCorpus {
    /// Truncate each sequence to `max_entries` and check they line up.
    pub fn from_parts(
        mut targets: Vec<VoxelGrid>,
        mut names: Vec<String>,
        mut instructions: Vec<Vec<String>>,
        max_entries: usize,
    ) -> Result<Self> {
        targets.truncate(max_entries);
        names.truncate(max_entries);
        instructions.truncate(max_entries);

        if targets.is_empty() {
            return Err(Error::DataLoad("target corpus is empty".into()));
        }
        if targets.len() != names.len() || targets.len() != instructions.len() {
            return Err(Error::DataLoad(format!(
                "corpus sequences are misaligned: {} targets, {} names, {} instructions",
                targets.len(),
                names.len(),
                instructions.len()
            )));
        }
        Ok(Self { targets, names, instructions })
    }

    /// Load the three corpus files named by `config`.
    pub fn load(config: &DatasetConfig) -> Result<Self> {
        let targets: Vec<VoxelGrid> = read_json(&config.targets_path)?;
        let names: Vec<String> = read_json(&config.names_path)?;
        let instructions: Vec<Vec<String>> = read_json(&config.instructions_path)?;
        let corpus = Self::from_parts(targets, names, instructions, config.max_entries)?;
        log::info!(
            "loaded target corpus: {} entries from {}",
            corpus.len(),
            config.targets_path.display()
        );
        Ok(corpus)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn target(&self, idx: usize) -> Result<&VoxelGrid> {
        self.targets.get(idx).ok_or_else(|| self.out_of_range(idx))
    }

    pub fn name(&self, idx: usize) -> Result<&str> {
        self.names.get(idx).map(String::as_str).ok_or_else(|| self.out_of_range(idx))
    }

    pub fn instruction(&self, idx: usize) -> Result<&[String]> {
        self.instructions.get(idx).map(Vec::as_slice).ok_or_else(|| self.out_of_range(idx))
    }

    fn out_of_range(&self, idx: usize) -> Error {
        Error::DataLoad(format!("corpus index {} out of range (len {})", idx, self.len()))
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::DataLoad(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&json).map_err(|e| Error::DataLoad(format!("{}: {}", path.display(), e)))
}

/// Produces figures from a [`TargetCorpus`] in round-robin order.
pub struct DatasetFigureGenerator<P> {
    corpus: TargetCorpus,
    predictor: P,
    use_dialogue: bool,
    main_figure: Option<usize>,
    call_count: usize,
}

impl<P: TargetPredictor> DatasetFigureGenerator<P> {
    pub fn new(corpus: TargetCorpus, predictor: P) -> Self {
        Self {
            corpus,
            predictor,
            use_dialogue: true,
            main_figure: None,
            call_count: 0,
        }
    }

    /// Load the corpus named by `config` and apply its settings.
    pub fn from_config(config: &DatasetConfig, predictor: P) -> Result<Self> {
        let corpus = TargetCorpus::load(config)?;
        if let Some(idx) = config.main_figure {
            corpus.target(idx)?;
        }
        Ok(Self {
            use_dialogue: config.use_dialogue,
            main_figure: config.main_figure,
            ..Self::new(corpus, predictor)
        })
    }

    pub fn with_dialogue(mut self, use_dialogue: bool) -> Self {
        self.use_dialogue = use_dialogue;
        self
    }

    pub fn with_main_figure(mut self, main_figure: Option<usize>) -> Self {
        self.main_figure = main_figure;
        self
    }

    pub fn corpus(&self) -> &TargetCorpus {
        &self.corpus
    }

    /// Build the figure for corpus entry `idx`.
    ///
    /// With `use_dialogue` the predictor's grid is used and compared against
    /// the ground truth; otherwise the ground truth is used and counts as
    /// correctly predicted. The grid is shifted by one cell along both
    /// horizontal axes before canonicalization.
    pub fn load_figure(&self, idx: usize, use_dialogue: bool) -> Result<Figure> {
        let original = self.corpus.target(idx)?;
        let name = self.corpus.name(idx)?;

        let (predicted, right_predicted) = if use_dialogue {
            let predicted = self.predictor.predict(self.corpus.instruction(idx)?)?;
            let matches = predicted.binarize() == original.binarize();
            (predicted, matches)
        } else {
            (original.clone(), true)
        };

        if !right_predicted {
            log::debug!("target {} ({}) was mispredicted", idx, name);
        }

        FigureBuilder::new(FigureOrigin::DatasetDriven { index: idx })
            .raw(predicted.shifted_horizontal())
            .params(FigureParams {
                name: Some(name.to_string()),
                original: Some(original.clone()),
                right_predicted: Some(right_predicted),
                ..Default::default()
            })
            .build()
    }

    /// Infinite cursor over the corpus: the n-th item is entry `n % len`.
    ///
    /// Each call starts a fresh cursor at entry 0.
    pub fn figures_generator(&self, use_dialogue: bool) -> FigureCursor<'_, P> {
        FigureCursor {
            source: self,
            use_dialogue,
            calls: 0,
        }
    }

    /// Next task: the configured main figure, or the next corpus entry.
    pub fn make_task(&mut self) -> Result<Figure> {
        if let Some(idx) = self.main_figure {
            return self.load_figure(idx, true);
        }
        let idx = self.call_count % self.corpus.len();
        self.call_count += 1;
        self.load_figure(idx, self.use_dialogue)
    }
}

/// Round-robin iterator returned by
/// [`DatasetFigureGenerator::figures_generator`]. Never ends.
pub struct FigureCursor<'a, P> {
    source: &'a DatasetFigureGenerator<P>,
    use_dialogue: bool,
    calls: usize,
}

impl<P> FigureCursor<'_, P> {
    /// Number of items produced so far.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl<P: TargetPredictor> Iterator for FigureCursor<'_, P> {
    type Item = Result<(Figure, Vec<String>)>;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.calls % self.source.corpus.len();
        self.calls += 1;
        let item = self.source.load_figure(idx, self.use_dialogue).and_then(|figure| {
            let instruction = self.source.corpus.instruction(idx)?.to_vec();
            Ok((figure, instruction))
        });
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GridPos;

    fn tower(x: usize, y: usize, height: usize, color: i32) -> VoxelGrid {
        let mut grid = VoxelGrid::new();
        for z in 0..height {
            grid.set(GridPos::new(z, x, y), color);
        }
        grid
    }

    fn corpus(len: usize) -> TargetCorpus {
        let targets = (0..len).map(|i| tower(i % 9, 2, 1 + i % 5, 1 + (i % 6) as i32)).collect();
        let names = (0..len).map(|i| format!("target_{}", i)).collect();
        let instructions = (0..len).map(|i| vec!["build".to_string(), i.to_string()]).collect();
        TargetCorpus::from_parts(targets, names, instructions, 300).unwrap()
    }

    fn ground_truth(len: usize) -> DatasetFigureGenerator<GroundTruthPredictor> {
        let corpus = corpus(len);
        let predictor = GroundTruthPredictor::from_corpus(&corpus);
        DatasetFigureGenerator::new(corpus, predictor)
    }

    #[test]
    fn test_corpus_truncates_to_cap() {
        let corpus = corpus(5);
        assert_eq!(corpus.len(), 5);
        let targets = vec![VoxelGrid::new(); 400];
        let names = vec![String::new(); 400];
        let instructions = vec![Vec::new(); 400];
        let capped = TargetCorpus::from_parts(targets, names, instructions, 300).unwrap();
        assert_eq!(capped.len(), 300);
    }

    #[test]
    fn test_corpus_misaligned() {
        let err = TargetCorpus::from_parts(vec![VoxelGrid::new(); 3], vec![String::new(); 2], vec![Vec::new(); 3], 300)
            .unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
        let err = TargetCorpus::from_parts(Vec::new(), Vec::new(), Vec::new(), 300).unwrap_err();
        assert!(matches!(err, Error::DataLoad(_)));
    }

    #[test]
    fn test_load_figure_shifts_coordinates() {
        let generator = ground_truth(3);
        let figure = generator.load_figure(1, false).unwrap();
        // entry 1 is a tower of height 2 at (1, 2), shifted to (2, 3)
        assert_eq!(figure.relief().get(2, 3), 2);
        assert_eq!(figure.relief().get(1, 2), 0);
        assert_eq!(figure.colors().at(0, 2, 3), 2);
        let params = figure.params();
        assert_eq!(params.name.as_deref(), Some("target_1"));
        assert_eq!(params.right_predicted, Some(true));
        assert_eq!(params.original.as_ref().map(|g| g.at(0, 1, 2)), Some(2));
        assert_eq!(figure.origin(), &FigureOrigin::DatasetDriven { index: 1 });
    }

    #[test]
    fn test_load_figure_out_of_range() {
        let generator = ground_truth(3);
        assert!(matches!(generator.load_figure(3, false), Err(Error::DataLoad(_))));
    }

    #[test]
    fn test_predictor_mismatch_is_recorded() {
        let corpus = corpus(2);
        let predictor = FnPredictor(|_: &[String]| -> Result<VoxelGrid> { Ok(tower(0, 0, 1, 3)) });
        let generator = DatasetFigureGenerator::new(corpus, predictor);
        let figure = generator.load_figure(1, true).unwrap();
        assert_eq!(figure.params().right_predicted, Some(false));
        // the predicted grid is what gets built
        assert_eq!(figure.relief().get(1, 1), 1);
    }

    #[test]
    fn test_predictor_match_ignores_color() {
        let corpus = corpus(2);
        let predictor = FnPredictor(|_: &[String]| -> Result<VoxelGrid> { Ok(tower(0, 2, 1, 6)) });
        let generator = DatasetFigureGenerator::new(corpus, predictor);
        let figure = generator.load_figure(0, true).unwrap();
        assert_eq!(figure.params().right_predicted, Some(true));
    }

    #[test]
    fn test_predictor_error_propagates() {
        let predictor = FnPredictor(|_: &[String]| -> Result<VoxelGrid> { Err(Error::Predictor("offline".into())) });
        let generator = DatasetFigureGenerator::new(corpus(2), predictor);
        assert!(matches!(generator.load_figure(0, true), Err(Error::Predictor(_))));
        assert!(generator.load_figure(0, false).is_ok());
    }

    #[test]
    fn test_cursor_wraps_around() {
        let generator = ground_truth(4);
        let names: Vec<_> = generator
            .figures_generator(true)
            .take(9)
            .map(|item| item.unwrap().0.params().name.clone().unwrap())
            .collect();
        assert_eq!(names[0], "target_0");
        assert_eq!(names[4], "target_0");
        assert_eq!(names[8], "target_0");
        assert_eq!(names[5], "target_1");
    }

    #[test]
    fn test_cursor_restarts() {
        let generator = ground_truth(4);
        let mut first = generator.figures_generator(false);
        first.next();
        first.next();
        assert_eq!(first.calls(), 2);
        let (_, instruction) = generator.figures_generator(false).next().unwrap().unwrap();
        assert_eq!(instruction, vec!["build".to_string(), "0".to_string()]);
    }

    #[test]
    fn test_make_task_round_robin_and_main_figure() {
        let mut generator = ground_truth(2);
        let indices: Vec<_> = (0..5)
            .map(|_| match generator.make_task().unwrap().origin() {
                FigureOrigin::DatasetDriven { index } => *index,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(indices, vec![0, 1, 0, 1, 0]);

        let mut pinned = ground_truth(3).with_main_figure(Some(2));
        for _ in 0..3 {
            let figure = pinned.make_task().unwrap();
            assert_eq!(figure.origin(), &FigureOrigin::DatasetDriven { index: 2 });
        }
    }

    #[test]
    fn test_ground_truth_predictor_keeps_first_duplicate() {
        let shared = vec!["build".to_string(), "tower".to_string()];
        let corpus = TargetCorpus::from_parts(
            vec![tower(2, 2, 2, 1), tower(6, 6, 1, 3)],
            vec!["first".into(), "second".into()],
            vec![shared.clone(), shared],
            300,
        )
        .unwrap();
        let predictor = GroundTruthPredictor::from_corpus(&corpus);
        assert_eq!(predictor.len(), 1);
        let generator = DatasetFigureGenerator::new(corpus, predictor);

        let first = generator.load_figure(0, true).unwrap();
        assert_eq!(first.params().right_predicted, Some(true));
        assert_eq!(first.relief().get(3, 3), 2);
        assert_eq!(first.relief().get(7, 7), 0);

        let second = generator.load_figure(1, true).unwrap();
        assert_eq!(second.params().right_predicted, Some(false));
    }

    #[test]
    fn test_ground_truth_predictor_unknown_instruction() {
        let predictor = GroundTruthPredictor::from_corpus(&corpus(2));
        assert!(matches!(
            predictor.predict(&["unknown".to_string()]),
            Err(Error::Predictor(_))
        ));
    }
}
