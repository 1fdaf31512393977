use forecast_lib;
use anyhow::Context;
use std::path::PathBuf;

pub struct FileStorage {
    directory : PathBuf
}

impl FileStorage {
    pub fn create() -> anyhow::Result<FileStorage> {
        FileStorage::create_in(".")
    }

    pub fn create_in(directory : impl Into<PathBuf>) -> anyhow::Result<FileStorage> {
        let directory = directory.into();
        std::fs::create_dir_all(&directory)
            .with_context(|| format!("Failed to create storage directory {}", directory.display()))?;
        Ok(FileStorage { directory })
    }

    fn entry_path(&self, name : &str) -> PathBuf {
        self.directory.join(format!("{}.json", name))
    }
}

impl forecast_lib::Storage for FileStorage {
    fn save_price_history(&mut self, name : &str, history : &forecast_lib::PriceHistory) -> anyhow::Result<()> {
        let path = self.entry_path(name);
        let file = std::fs::File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;

        ::serde_json::to_writer(&file, history)?;
        Ok(())
    }

    fn load_price_history(&mut self, name : &str) -> anyhow::Result<forecast_lib::PriceHistory> {
        let path = self.entry_path(name);
        let file = std::fs::File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let history = ::serde_json::from_reader(&file)
            .with_context(|| format!("Failed to parse price history {}", path.display()))?;
        Ok(history)
    }
}
