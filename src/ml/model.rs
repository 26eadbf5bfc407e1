use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Dropout, DropoutConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
        Lstm, LstmConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid, softmax},
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct GrowthModelConfig {
    #[config(default = 8)]
    pub input_size:  usize,
    #[config(default = 128)]
    pub hidden_size: usize,
    #[config(default = 2)]
    pub num_layers:  usize,
    #[config(default = 64)]
    pub trunk_size:  usize,
    #[config(default = 32)]
    pub shared_size: usize,
    /// Total width of the stacked heads: three scalar heads + bounds
    #[config(default = 5)]
    pub output_size: usize,
    #[config(default = 0.3)]
    pub dropout:     f64,
}

/// Score, burnout and velocity heads, one output each.
const SCALAR_HEADS: usize = 3;

impl GrowthModelConfig {
    /// Width of the bounds head, whatever `output_size` leaves after the scalar heads.
    pub fn bounds_size(&self) -> usize {
        self.output_size.saturating_sub(SCALAR_HEADS).max(1)
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> GrowthModel<B> {
        let input_norm = LayerNormConfig::new(self.input_size).init(device);

        // First layer reads features, the rest read the layer below.
        let encoder: Vec<Lstm<B>> = (0..self.num_layers.max(1))
            .map(|layer| {
                let d_input = if layer == 0 { self.input_size } else { self.hidden_size };
                LstmConfig::new(d_input, self.hidden_size, true).init(device)
            })
            .collect();

        GrowthModel {
            input_norm,
            encoder,
            encoder_dropout: DropoutConfig::new(self.dropout).init(),
            attention:       SelfAttentionConfig::new(self.hidden_size).init(device),
            trunk_in:        LinearConfig::new(self.hidden_size, self.trunk_size).init(device),
            trunk_out:       LinearConfig::new(self.trunk_size, self.shared_size).init(device),
            trunk_dropout:   DropoutConfig::new(self.dropout).init(),
            shared_dropout:  DropoutConfig::new(self.dropout / 2.0).init(),
            score_head:      LinearConfig::new(self.shared_size, 1).init(device),
            burnout_head:    LinearConfig::new(self.shared_size, 1).init(device),
            velocity_head:   LinearConfig::new(self.shared_size, 1).init(device),
            bounds_head:     LinearConfig::new(self.shared_size, self.bounds_size()).init(device),
        }
    }
}

// ─── Self-attention ───────────────────────────────────────────────────────────
// Single-head scaled dot-product attention over the encoder states.
#[derive(Config, Debug)]
pub struct SelfAttentionConfig {
    pub hidden_size: usize,
}

impl SelfAttentionConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SelfAttention<B> {
        SelfAttention {
            query: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            key:   LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            value: LinearConfig::new(self.hidden_size, self.hidden_size).init(device),
            scale: (self.hidden_size as f64).sqrt(),
        }
    }
}

#[derive(Module, Debug)]
pub struct SelfAttention<B: Backend> {
    pub query: Linear<B>,
    pub key:   Linear<B>,
    pub value: Linear<B>,
    pub scale: f64,
}

impl<B: Backend> SelfAttention<B> {
    /// x: [batch, seq, hidden] → (attended [batch, seq, hidden], weights [batch, seq, seq])
    pub fn forward(&self, x: Tensor<B, 3>) -> (Tensor<B, 3>, Tensor<B, 3>) {
        let q = self.query.forward(x.clone());
        let k = self.key.forward(x.clone());
        let v = self.value.forward(x);

        let scores  = q.matmul(k.swap_dims(1, 2)).div_scalar(self.scale);
        let weights = softmax(scores, 2);
        (weights.clone().matmul(v), weights)
    }
}

// ─── Growth model ─────────────────────────────────────────────────────────────
#[derive(Module, Debug)]
pub struct GrowthModel<B: Backend> {
    pub input_norm:      LayerNorm<B>,
    pub encoder:         Vec<Lstm<B>>,
    pub encoder_dropout: Dropout,
    pub attention:       SelfAttention<B>,
    pub trunk_in:        Linear<B>,
    pub trunk_out:       Linear<B>,
    pub trunk_dropout:   Dropout,
    pub shared_dropout:  Dropout,
    pub score_head:      Linear<B>,
    pub burnout_head:    Linear<B>,
    pub velocity_head:   Linear<B>,
    pub bounds_head:     Linear<B>,
}

/// Raw head outputs, all in training-label units (score / 100,
/// velocity / 20, bounds / 100).
pub struct GrowthOutput<B: Backend> {
    /// [batch, 1]
    pub score:    Tensor<B, 2>,
    /// [batch, 1], in [0, 1]
    pub burnout:  Tensor<B, 2>,
    /// [batch, 1]
    pub velocity: Tensor<B, 2>,
    /// [batch, output_size - 3]; lower, upper by default
    pub bounds:   Tensor<B, 2>,
    /// [batch, seq, seq]
    pub attention_weights: Tensor<B, 3>,
}

impl<B: Backend> GrowthOutput<B> {
    /// [batch, 5] in TargetVector order.
    pub fn stacked(&self) -> Tensor<B, 2> {
        Tensor::cat(
            vec![
                self.score.clone(),
                self.burnout.clone(),
                self.velocity.clone(),
                self.bounds.clone(),
            ],
            1,
        )
    }
}

impl<B: Backend> GrowthModel<B> {
    /// sequences: [batch, seq_len, input_size]
    pub fn forward(&self, sequences: Tensor<B, 3>) -> GrowthOutput<B> {
        let x = self.input_norm.forward(sequences);

        // Forward-only recurrence; dropout between layers, not after the last.
        let mut hidden = x;
        for (layer, lstm) in self.encoder.iter().enumerate() {
            if layer > 0 {
                hidden = self.encoder_dropout.forward(hidden);
            }
            let (out, _state) = lstm.forward(hidden, None);
            hidden = out;
        }

        let (attended, attention_weights) = self.attention.forward(hidden);

        let [batch, seq_len, d_hidden] = attended.dims();
        let last = attended
            .slice([0..batch, seq_len - 1..seq_len, 0..d_hidden])
            .reshape([batch, d_hidden]);

        let shared = self.trunk_dropout.forward(relu(self.trunk_in.forward(last)));
        let shared = self.shared_dropout.forward(relu(self.trunk_out.forward(shared)));

        GrowthOutput {
            score:    self.score_head.forward(shared.clone()),
            burnout:  sigmoid(self.burnout_head.forward(shared.clone())),
            velocity: self.velocity_head.forward(shared.clone()),
            bounds:   self.bounds_head.forward(shared),
            attention_weights,
        }
    }

    /// Mean-squared error of all five outputs against the labels.
    pub fn forward_loss(
        &self,
        sequences: Tensor<B, 3>,
        targets:   Tensor<B, 2>,
    ) -> (Tensor<B, 1>, GrowthOutput<B>) {
        let output = self.forward(sequences);
        let loss   = MseLoss::new().forward(output.stacked(), targets, Reduction::Mean);
        (loss, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small_config() -> GrowthModelConfig {
        GrowthModelConfig::new().with_hidden_size(16).with_dropout(0.0)
    }

    #[test]
    fn test_default_architecture() {
        let cfg = GrowthModelConfig::new();
        assert_eq!(cfg.input_size, 8);
        assert_eq!(cfg.hidden_size, 128);
        assert_eq!(cfg.num_layers, 2);
        assert_eq!(cfg.output_size, 5);
    }

    #[test]
    fn test_output_shapes() {
        let device = Default::default();
        let model: GrowthModel<TestBackend> = small_config().init(&device);
        let input  = Tensor::<TestBackend, 3>::ones([3, 14, 8], &device);
        let out    = model.forward(input);

        assert_eq!(out.score.dims(), [3, 1]);
        assert_eq!(out.burnout.dims(), [3, 1]);
        assert_eq!(out.velocity.dims(), [3, 1]);
        assert_eq!(out.bounds.dims(), [3, 2]);
        assert_eq!(out.stacked().dims(), [3, 5]);
        assert_eq!(out.attention_weights.dims(), [3, 14, 14]);
    }

    #[test]
    fn test_output_size_sets_stacked_width() {
        let device = Default::default();
        let cfg    = small_config().with_output_size(6);
        let model: GrowthModel<TestBackend> = cfg.init(&device);
        let out    = model.forward(Tensor::<TestBackend, 3>::ones([2, 14, 8], &device));

        assert_eq!(cfg.bounds_size(), 3);
        assert_eq!(out.bounds.dims(), [2, 3]);
        assert_eq!(out.stacked().dims(), [2, 6]);
    }

    #[test]
    fn test_burnout_head_is_bounded() {
        let device = Default::default();
        let model: GrowthModel<TestBackend> = small_config().init(&device);
        let input  = Tensor::<TestBackend, 3>::random(
            [4, 14, 8],
            burn::tensor::Distribution::Uniform(-50.0, 50.0),
            &device,
        );
        let burnout: Vec<f32> = model.forward(input).burnout.into_data().to_vec().unwrap();
        assert!(burnout.iter().all(|b| (0.0..=1.0).contains(b)));
    }

    #[test]
    fn test_attention_rows_sum_to_one() {
        let device = Default::default();
        let model: GrowthModel<TestBackend> = small_config().init(&device);
        let input  = Tensor::<TestBackend, 3>::ones([1, 14, 8], &device);
        let sums: Vec<f32> = model
            .forward(input)
            .attention_weights
            .sum_dim(2)
            .into_data()
            .to_vec()
            .unwrap();
        assert!(sums.iter().all(|s| (s - 1.0).abs() < 1e-4));
    }

    #[test]
    fn test_forward_is_pure() {
        let device = Default::default();
        let model: GrowthModel<TestBackend> = small_config().init(&device);
        let input  = Tensor::<TestBackend, 3>::ones([1, 14, 8], &device);
        let a: Vec<f32> = model.forward(input.clone()).stacked().into_data().to_vec().unwrap();
        let b: Vec<f32> = model.forward(input).stacked().into_data().to_vec().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_loss_is_scalar_and_finite() {
        let device  = Default::default();
        let model: GrowthModel<TestBackend> = small_config().init(&device);
        let input   = Tensor::<TestBackend, 3>::zeros([2, 14, 8], &device);
        let targets = Tensor::<TestBackend, 2>::zeros([2, 5], &device);
        let (loss, _) = model.forward_loss(input, targets);
        let value: f32 = loss.into_scalar();
        assert!(value.is_finite());
    }
}
