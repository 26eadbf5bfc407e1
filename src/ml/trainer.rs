// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Pools the sliding windows of every subject with enough
// history and fits GrowthModel to the synthetic labels.
//
//   - AdamW (weight decay 1e-4)
//   - gradients rescaled together so their global L2 norm is
//     at most 1.0 before every optimiser step
//   - MSE over the stacked 5-vector vs. the TargetVector
//   - LR halved when the epoch loss stops improving
//   - weights persisted once, after the last epoch
//
// Zero epochs is rejected up front.
// An empty pool is not an error: the caller gets a freshly
// initialised model back with `report == None` and a warning
// in the log, and nothing is written to disk. There is no
// partial-epoch checkpointing; an interrupted run is lost.
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::{bail, Result};
use burn::{
    data::dataloader::DataLoaderBuilder,
    module::{ModuleVisitor, ParamId},
    optim::{AdamWConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{backend::AutodiffBackend, ElementConversion},
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::GrowthBatcher, dataset::GrowthDataset, windows::SEQUENCE_LENGTH};
use crate::domain::activity::SubjectHistory;
use crate::infra::checkpoint::{CheckpointManager, CheckpointManifest};
use crate::infra::metrics::{EpochMetrics, MetricsLogger};
use crate::ml::model::{GrowthModel, GrowthModelConfig};
use crate::ml::TrainBackend;

/// Relative improvement an epoch needs to count as progress.
const PLATEAU_THRESHOLD: f64 = 1e-4;

/// Added to the global norm before dividing.
const CLIP_EPSILON: f64 = 1e-6;

// ─── Plateau scheduler ────────────────────────────────────────────────────────
/// Multiplies the learning rate by `factor` once the loss has failed
/// to improve for more than `patience` consecutive epochs.
#[derive(Debug, Clone)]
pub struct PlateauScheduler {
    lr:         f64,
    patience:   usize,
    factor:     f64,
    best:       f64,
    bad_epochs: usize,
}

impl PlateauScheduler {
    pub fn new(lr: f64, patience: usize, factor: f64) -> Self {
        Self { lr, patience, factor, best: f64::INFINITY, bad_epochs: 0 }
    }

    pub fn lr(&self) -> f64 {
        self.lr
    }

    /// Feed one epoch's mean loss; returns the LR for the next epoch.
    pub fn step(&mut self, loss: f64) -> f64 {
        if loss < self.best * (1.0 - PLATEAU_THRESHOLD) {
            self.best       = loss;
            self.bad_epochs = 0;
        } else {
            self.bad_epochs += 1;
        }

        if self.bad_epochs > self.patience {
            self.lr        *= self.factor;
            self.bad_epochs = 0;
            tracing::info!("Loss plateaued, learning rate reduced to {:.2e}", self.lr);
        }
        self.lr
    }
}

// ─── Global gradient-norm clipping ────────────────────────────────────────────
/// Scale every gradient of `module` by `min(1, max_norm / (‖g‖ + ε))`,
/// where ‖g‖ is the L2 norm over all parameters taken together.
/// Returns ‖g‖ before scaling.
pub fn clip_grad_norm<B: AutodiffBackend, M: Module<B>>(
    module:   &M,
    grads:    &mut GradientsParams,
    max_norm: f64,
) -> f64 {
    let mut norm = GradNorm { grads: &*grads, sum_sq: 0.0 };
    module.visit(&mut norm);
    let total = norm.sum_sq.sqrt();

    let scale = max_norm / (total + CLIP_EPSILON);
    if scale < 1.0 {
        module.visit(&mut GradScale { grads, scale });
    }
    total
}

struct GradNorm<'a> {
    grads:  &'a GradientsParams,
    sum_sq: f64,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for GradNorm<'_> {
    fn visit_float<const D: usize>(&mut self, id: ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.get::<B::InnerBackend, D>(id) {
            self.sum_sq += grad.powf_scalar(2.0).sum().into_scalar().elem::<f64>();
        }
    }
}

struct GradScale<'a> {
    grads: &'a mut GradientsParams,
    scale: f64,
}

impl<B: AutodiffBackend> ModuleVisitor<B> for GradScale<'_> {
    fn visit_float<const D: usize>(&mut self, id: ParamId, _tensor: &Tensor<B, D>) {
        if let Some(grad) = self.grads.remove::<B::InnerBackend, D>(id) {
            self.grads.register(id, grad.mul_scalar(self.scale));
        }
    }
}

// ─── Outcome ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub subjects:   usize,
    pub windows:    usize,
    pub epochs:     usize,
    pub final_loss: f64,
    pub final_lr:   f64,
}

pub struct TrainOutcome<B: AutodiffBackend> {
    pub model:  GrowthModel<B>,
    /// None when the corpus had no usable windows and `model` is untrained
    pub report: Option<TrainingReport>,
}

impl<B: AutodiffBackend> TrainOutcome<B> {
    pub fn is_trained(&self) -> bool {
        self.report.is_some()
    }
}

pub fn run_training(
    cfg:          &TrainConfig,
    histories:    &[SubjectHistory],
    ckpt_manager: &CheckpointManager,
) -> Result<TrainOutcome<TrainBackend>> {
    let device = Default::default();
    train_model::<TrainBackend>(cfg, &GrowthModelConfig::new(), histories, ckpt_manager, &device)
}

pub fn train_model<B: AutodiffBackend>(
    cfg:          &TrainConfig,
    model_cfg:    &GrowthModelConfig,
    histories:    &[SubjectHistory],
    ckpt_manager: &CheckpointManager,
    device:       &B::Device,
) -> Result<TrainOutcome<B>> {
    if cfg.epochs == 0 {
        bail!("Training needs at least one epoch");
    }
    tracing::info!("Training on {} subject histories", histories.len());

    B::seed(cfg.seed);
    let mut model: GrowthModel<B> = model_cfg.init(device);

    // ── Pool windows ──────────────────────────────────────────────────────────
    let dataset  = GrowthDataset::from_histories(histories, SEQUENCE_LENGTH);
    let windows  = dataset.sample_count();
    let subjects = histories.iter().filter(|h| h.days() > SEQUENCE_LENGTH).count();

    if dataset.is_empty() {
        tracing::warn!(
            "Not enough data for training: every history has ≤ {} days. \
             Returning an untrained model; nothing was saved.",
            SEQUENCE_LENGTH
        );
        return Ok(TrainOutcome { model, report: None });
    }
    tracing::info!("{} windows from {} subjects", windows, subjects);

    // ── AdamW; clipping is applied to the gradients before each step ─────────
    let mut optim = AdamWConfig::new()
        .with_weight_decay(cfg.weight_decay as f32)
        .init::<B, GrowthModel<B>>();

    let loader = DataLoaderBuilder::new(GrowthBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size.max(1))
        .shuffle(cfg.seed)
        .build(dataset);

    let metrics   = MetricsLogger::create(ckpt_manager.dir())?;
    let mut sched = PlateauScheduler::new(cfg.lr, cfg.plateau_patience, cfg.plateau_factor);
    let epochs    = cfg.epochs;
    let mut final_loss = f64::NAN;

    // ── Epoch loop ────────────────────────────────────────────────────────────
    for epoch in 1..=epochs {
        let lr = sched.lr();
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in loader.iter() {
            let (loss, _) = model.forward_loss(batch.sequences, batch.targets);

            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let mut grads = GradientsParams::from_grads(grads, &model);
            clip_grad_norm(&model, &mut grads, cfg.grad_clip_norm);
            model = optim.step(lr, model, grads);
        }

        let avg_loss = loss_sum / batches.max(1) as f64;
        final_loss   = avg_loss;
        metrics.log(&EpochMetrics::new(epoch, avg_loss, lr))?;
        sched.step(avg_loss);

        if epoch % 10 == 0 || epoch == epochs {
            println!("Epoch {:>3}/{} | loss={:.5} | lr={:.2e}", epoch, epochs, avg_loss, lr);
        }
        tracing::debug!("Epoch {} done: loss={:.6}, batches={}", epoch, avg_loss, batches);
    }

    // ── Persist ───────────────────────────────────────────────────────────────
    let manifest = CheckpointManifest::new(model_cfg.clone(), windows, epochs, final_loss);
    ckpt_manager.save_model(&model, &manifest)?;
    tracing::info!("Model saved to '{}'", ckpt_manager.dir().display());

    Ok(TrainOutcome {
        model,
        report: Some(TrainingReport {
            subjects,
            windows,
            epochs,
            final_loss,
            final_lr: sched.lr(),
        }),
    })
}
