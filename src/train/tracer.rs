use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::data::DatasetEntry;
use crate::error::Result;

use super::{epoch_stats::EpochStats, evaluation::Evaluate};

/// Receives the trainer once per epoch, right after that epoch's update.
pub trait TraceSink {
    fn trace(&mut self, epoch: usize, evaluator: &dyn Evaluate);
}

impl<F> TraceSink for F
where
    F: FnMut(usize, &dyn Evaluate),
{
    fn trace(&mut self, epoch: usize, evaluator: &dyn Evaluate) {
        self(epoch, evaluator)
    }
}

/// Records train and test cost/accuracy after every epoch and writes them
/// out in a compact binary layout (see [`Tracer::write_to`]).
pub struct Tracer<'a> {
    train_ds: &'a [DatasetEntry],
    test_ds: &'a [DatasetEntry],
    nb_epochs: usize,
    minibatch_size: usize,
    learning_rate: f64,
    loading_count: usize,
    stats: Vec<EpochStats>,
}

impl<'a> Tracer<'a> {
    pub fn new(train_ds: &'a [DatasetEntry], test_ds: &'a [DatasetEntry]) -> Tracer<'a> {
        Tracer {
            train_ds,
            test_ds,
            nb_epochs: 0,
            minibatch_size: 0,
            learning_rate: 0.0,
            loading_count: 1,
            stats: Vec::new(),
        }
    }

    /// Records the run parameters and drops previous stats. Use
    /// `minibatch_size = 0` for full-batch runs.
    pub fn init(&mut self, nb_epochs: usize, minibatch_size: usize, learning_rate: f64) {
        self.nb_epochs = nb_epochs;
        self.minibatch_size = minibatch_size;
        self.learning_rate = learning_rate;
        self.loading_count = (nb_epochs / 100).max(1);
        self.stats = Vec::with_capacity(nb_epochs);
    }

    pub fn stats(&self) -> &[EpochStats] {
        &self.stats
    }

    /// `train_<nb_epochs>_<learning_rate>_<minibatch_size>.out`
    pub fn file_name(&self) -> String {
        format!(
            "train_{}_{}_{}.out",
            self.nb_epochs, self.learning_rate, self.minibatch_size
        )
    }

    /// Writes, little-endian: `nb_epochs: u64`, `minibatch_size: u64`,
    /// `learning_rate: f64`, then `nb_epochs` f64 values each of train costs,
    /// train accuracy, test costs and test accuracy. Epochs that were never
    /// traced are written as 0.
    pub fn write_to<W: Write>(&self, mut w: W) -> Result<()> {
        w.write_all(&(self.nb_epochs as u64).to_le_bytes())?;
        w.write_all(&(self.minibatch_size as u64).to_le_bytes())?;
        w.write_all(&self.learning_rate.to_le_bytes())?;

        let series: [fn(&EpochStats) -> f64; 4] = [
            |s| s.train_cost,
            |s| s.train_accuracy,
            |s| s.test_cost,
            |s| s.test_accuracy,
        ];
        for field in series {
            let mut values = vec![0.0f64; self.nb_epochs];
            for s in self.stats.iter().filter(|s| s.epoch < self.nb_epochs) {
                values[s.epoch] = field(s);
            }
            for v in values {
                w.write_all(&v.to_le_bytes())?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Writes the trace into `dir` under [`Tracer::file_name`] and returns
    /// the full path.
    pub fn dump<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(self.file_name());
        self.write_to(BufWriter::new(File::create(&path)?))?;
        info!("trace written to {}", path.display());
        Ok(path)
    }
}

impl TraceSink for Tracer<'_> {
    fn trace(&mut self, epoch: usize, evaluator: &dyn Evaluate) {
        let train = evaluator.evaluate(self.train_ds);
        let test = evaluator.evaluate(self.test_ds);
        self.stats.push(EpochStats {
            epoch,
            train_cost: train.cost,
            train_accuracy: train.accuracy,
            test_cost: test.cost,
            test_accuracy: test.accuracy,
        });

        if epoch % self.loading_count == 0 || epoch + 1 == self.nb_epochs {
            let percent = if self.nb_epochs == 0 {
                100
            } else {
                100 * (epoch + 1) / self.nb_epochs
            };
            info!("trace {percent} %");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::train::Evaluation;

    struct Fixed(Evaluation);

    impl Evaluate for Fixed {
        fn evaluate(&self, dataset: &[DatasetEntry]) -> Evaluation {
            Evaluation {
                cost: self.0.cost * dataset.len() as f64,
                accuracy: self.0.accuracy,
            }
        }
    }

    fn entries(n: usize) -> Vec<DatasetEntry> {
        (0..n).map(|_| DatasetEntry::new([0.0], [0.0])).collect()
    }

    fn f64_at(bytes: &[u8], offset: usize) -> f64 {
        f64::from_le_bytes(bytes[offset..offset + 8].try_into().unwrap())
    }

    #[test]
    fn records_one_entry_per_trace() {
        let (train, test) = (entries(2), entries(1));
        let mut tracer = Tracer::new(&train, &test);
        tracer.init(3, 2, 0.5);
        let eval = Fixed(Evaluation { cost: 0.25, accuracy: 50.0 });
        for epoch in 0..3 {
            tracer.trace(epoch, &eval);
        }
        assert_eq!(tracer.stats().len(), 3);
        assert_eq!(tracer.stats()[2].train_cost, 0.5);
        assert_eq!(tracer.stats()[2].test_cost, 0.25);
        assert_eq!(tracer.file_name(), "train_3_0.5_2.out");
    }

    #[test]
    fn binary_layout() {
        let (train, test) = (entries(2), entries(1));
        let mut tracer = Tracer::new(&train, &test);
        tracer.init(2, 4, 0.01);
        tracer.trace(0, &Fixed(Evaluation { cost: 1.0, accuracy: 10.0 }));
        tracer.trace(1, &Fixed(Evaluation { cost: 2.0, accuracy: 20.0 }));

        let mut bytes = Vec::new();
        tracer.write_to(&mut bytes).unwrap();

        assert_eq!(bytes.len(), 8 + 8 + 8 + 4 * 2 * 8);
        assert_eq!(u64::from_le_bytes(bytes[0..8].try_into().unwrap()), 2);
        assert_eq!(u64::from_le_bytes(bytes[8..16].try_into().unwrap()), 4);
        assert_eq!(f64_at(&bytes, 16), 0.01);
        // train costs, train accuracy, test costs, test accuracy
        let body: Vec<f64> = (0..8).map(|i| f64_at(&bytes, 24 + 8 * i)).collect();
        assert_eq!(body, vec![2.0, 4.0, 10.0, 20.0, 1.0, 2.0, 10.0, 20.0]);
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        {
            let mut sink = |epoch: usize, _: &dyn Evaluate| seen.push(epoch);
            let sink: &mut dyn TraceSink = &mut sink;
            sink.trace(0, &Fixed(Evaluation::default()));
            sink.trace(1, &Fixed(Evaluation::default()));
        }
        assert_eq!(seen, vec![0, 1]);
    }
}
