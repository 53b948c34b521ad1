use seam_core::{Result, Tensor};

use crate::module::Module;

/// Fully connected linear layer: `y = x @ W^T + b`.
pub struct Linear {
    weight: Tensor,
    bias: Option<Tensor>,
}

impl Linear {
    /// Create a new Linear layer with deterministic golden-ratio init.
    pub fn new(in_features: usize, out_features: usize, bias: bool) -> Self {
        let limit = (6.0 / (in_features + out_features) as f32).sqrt();
        let weight_data: Vec<f32> = (0..in_features * out_features)
            .map(|i| {
                let x = ((i as f32 * 0.618034) % 1.0) * 2.0 - 1.0;
                x * limit
            })
            .collect();
        let weight = Tensor::from_f32(&weight_data, &[out_features, in_features]);

        let bias = bias.then(|| Tensor::zeros(&[out_features]));

        Self { weight, bias }
    }

    /// Create from an existing `[out, in]` weight tensor.
    pub fn from_weight(weight: Tensor, bias: Option<Tensor>) -> Self {
        assert_eq!(weight.rank(), 2, "Linear weight must be [out, in]");
        Self { weight, bias }
    }

    /// Input feature width.
    pub fn in_features(&self) -> usize {
        self.weight.shape().dims()[1]
    }

    /// Output feature width.
    pub fn out_features(&self) -> usize {
        self.weight.shape().dims()[0]
    }

    /// The weight tensor.
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// The bias tensor, if present.
    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }
}

impl Module for Linear {
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        let mut output = input.project(&self.weight)?;

        if let Some(ref bias) = self.bias {
            let out_w = self.out_features();
            let b = bias.as_slice();
            let mut data = output.as_slice().to_vec();
            for (i, v) in data.iter_mut().enumerate() {
                *v += b[i % out_w];
            }
            output = Tensor::from_f32(&data, output.shape().dims())
                .placed(output.device(), output.dtype());
        }

        Ok(output)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = vec![&self.weight];
        if let Some(ref b) = self.bias {
            params.push(b);
        }
        params
    }
}
