pub const DEFAULT_HORIZON : usize = 7;
pub const MAX_HORIZON : usize = 30;

pub const WINDOW_WIDTH : usize = 60;
pub const TRAIN_SPLIT : f32 = 0.8;

pub const EPOCHS : usize = 5;
pub const BATCH_SIZE : usize = 1;
pub const LEARNING_RATE : f64 = 1e-3;
pub const LSTM_UNITS : usize = 50;
pub const DENSE_UNITS : usize = 25;
pub const SEED : u64 = 1138;
