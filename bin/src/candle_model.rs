use forecast_lib;
use forecast_lib::{config, WindowedDataset};
use anyhow::anyhow;
use candle_core::{DType, Device, Module, Tensor};
use candle_nn::{AdamW, Linear, LSTM, LSTMConfig, Optimizer, ParamsAdamW, RNN, VarBuilder, VarMap};
use rand::{SeedableRng, seq::SliceRandom};
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct CandleTrainingParams {
    pub epochs : usize,
    pub batch_size : usize,
    pub learning_rate : f64,
    pub lstm_units : usize,
    pub dense_units : usize,
    /// Seeds the per-epoch shuffle. Weight initialisation uses candle's own generator.
    pub seed : u64
}

impl Default for CandleTrainingParams {
    fn default() -> Self {
        CandleTrainingParams { epochs : config::EPOCHS, batch_size : config::BATCH_SIZE,
            learning_rate : config::LEARNING_RATE, lstm_units : config::LSTM_UNITS,
            dense_units : config::DENSE_UNITS, seed : config::SEED }
    }
}

/// Two stacked LSTM layers followed by two linear layers, mapping `[batch, window, 1]` to `[batch]`.
struct LstmRegressor {
    sequence_layer : LSTM,
    summary_layer : LSTM,
    hidden_layer : Linear,
    output_layer : Linear
}

impl LstmRegressor {
    fn new(lstm_units : usize, dense_units : usize, vb : VarBuilder) -> candle_core::Result<LstmRegressor> {
        let sequence_layer = candle_nn::lstm(1, lstm_units, LSTMConfig::default(), vb.pp("lstm1"))?;
        let summary_layer = candle_nn::lstm(lstm_units, lstm_units, LSTMConfig::default(), vb.pp("lstm2"))?;
        let hidden_layer = candle_nn::linear(lstm_units, dense_units, vb.pp("dense1"))?;
        let output_layer = candle_nn::linear(dense_units, 1, vb.pp("dense2"))?;
        Ok(LstmRegressor { sequence_layer, summary_layer, hidden_layer, output_layer })
    }

    fn forward(&self, input : &Tensor) -> candle_core::Result<Tensor> {
        let states = self.sequence_layer.seq(input)?;
        let sequence = self.sequence_layer.states_to_tensor(&states)?;

        let states = self.summary_layer.seq(&sequence)?;
        let last_state = states.last().ok_or_else(|| candle_core::Error::Msg(String::from("Empty input sequence")))?;

        let hidden = self.hidden_layer.forward(last_state.h())?;
        self.output_layer.forward(&hidden)?.squeeze(1)
    }
}

struct TrainingArtifacts {
    network : LstmRegressor,
    window_width : usize
}

pub struct CandleModel {
    device : Device,
    training_artifacts : Option<TrainingArtifacts>
}

impl CandleModel {
    pub fn new() -> CandleModel {
        CandleModel { device : Device::Cpu, training_artifacts : None }
    }

    fn windows_to_tensor(&self, windows : &[&Vec<f32>], window_width : usize) -> anyhow::Result<Tensor> {
        let mut input = Vec::with_capacity(windows.len() * window_width);
        for window in windows {
            if window.len() != window_width {
                return Err(anyhow!("Passed window length {} should fit exactly the model input size {}",
                    window.len(), window_width));
            }
            input.extend_from_slice(window);
        }

        Ok(Tensor::from_slice(&input, (windows.len(), window_width, 1), &self.device)?)
    }
}

impl forecast_lib::ForecastModel for CandleModel {
    type TrainingParams = CandleTrainingParams;

    fn train(&mut self, dataset : &WindowedDataset, params : &Self::TrainingParams) -> anyhow::Result<()> {
        let window_width = dataset.inputs.first().map(|w| w.len()).ok_or(anyhow!("Training dataset is empty"))?;
        if window_width == 0 {
            return Err(anyhow!("Training windows are empty"));
        }
        if params.batch_size == 0 {
            return Err(anyhow!("Batch size must be at least 1"));
        }

        let var_map = VarMap::new();
        let vb = VarBuilder::from_varmap(&var_map, DType::F32, &self.device);
        let network = LstmRegressor::new(params.lstm_units, params.dense_units, vb)?;

        let adam_params = ParamsAdamW { lr : params.learning_rate, weight_decay : 0.0, ..Default::default() };
        let mut optimizer = AdamW::new(var_map.all_vars(), adam_params)?;

        let mut rng = rand::rngs::StdRng::seed_from_u64(params.seed);
        let mut indices : Vec<usize> = (0..dataset.len()).collect();
        for epoch in 0..params.epochs {
            indices.shuffle(&mut rng);

            let mut epoch_loss = 0.0;
            for batch in indices.chunks(params.batch_size) {
                let windows : Vec<&Vec<f32>> = batch.iter().map(|&i| &dataset.inputs[i]).collect();
                let targets : Vec<f32> = batch.iter().map(|&i| dataset.targets[i]).collect();

                let input_tensor = self.windows_to_tensor(&windows, window_width)?;
                let target_tensor = Tensor::from_slice(&targets, targets.len(), &self.device)?;

                let output_tensor = network.forward(&input_tensor)?;
                let loss_tensor = candle_nn::loss::mse(&output_tensor, &target_tensor)?;
                optimizer.backward_step(&loss_tensor)?;

                epoch_loss += loss_tensor.to_scalar::<f32>()? as f64 * batch.len() as f64;
            }

            info!("epoch: {:4} train loss: {:8.5}", epoch, epoch_loss / dataset.len() as f64);
        }

        self.training_artifacts = Some(TrainingArtifacts { network, window_width });
        Ok(())
    }

    fn predict(&mut self, windows : &[Vec<f32>]) -> anyhow::Result<Vec<f32>> {
        let training_artifacts = self.training_artifacts.as_ref().ok_or(anyhow!("Model has not been trained yet"))?;
        if windows.is_empty() {
            return Ok(Vec::new());
        }

        let windows : Vec<&Vec<f32>> = windows.iter().collect();
        let input_tensor = self.windows_to_tensor(&windows, training_artifacts.window_width)?;
        let output_tensor = training_artifacts.network.forward(&input_tensor)?;

        Ok(output_tensor.to_vec1::<f32>()?)
    }
}
