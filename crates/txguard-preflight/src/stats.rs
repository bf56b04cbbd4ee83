use parking_lot::Mutex;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;
use txguard_core::{traits::CounterStore, GuardStats};

/// Identificador fixo dos contadores persistidos
pub const STATS_KEY: &str = "base-tx-guard-stats";

/// Contadores mantidos apenas em memória
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    stats: Mutex<GuardStats>,
}

impl MemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CounterStore for MemoryCounterStore {
    fn read(&self) -> GuardStats {
        *self.stats.lock()
    }

    fn increment_prevented(&self) -> GuardStats {
        let mut stats = self.stats.lock();
        stats.prevented = stats.prevented.saturating_add(1);
        *stats
    }

    fn increment_successful(&self) -> GuardStats {
        let mut stats = self.stats.lock();
        stats.successful = stats.successful.saturating_add(1);
        *stats
    }
}

/// Contadores em um documento JSON `<dir>/base-tx-guard-stats.json`.
///
/// Arquivo ausente ou corrompido é lido como zero. Falhas de escrita são
/// registradas e não interrompem o chamador.
#[derive(Debug)]
pub struct FileCounterStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileCounterStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STATS_KEY)),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> GuardStats {
        match std::fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "contadores corrompidos, reiniciando");
                GuardStats::default()
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => GuardStats::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "falha ao ler contadores");
                GuardStats::default()
            }
        }
    }

    fn save(&self, stats: &GuardStats) {
        let result = serde_json::to_vec(stats)
            .map_err(std::io::Error::from)
            .and_then(|bytes| std::fs::write(&self.path, bytes));
        if let Err(e) = result {
            warn!(path = %self.path.display(), error = %e, "falha ao gravar contadores");
        }
    }

    fn update(&self, apply: impl FnOnce(&mut GuardStats)) -> GuardStats {
        let _guard = self.lock.lock();
        let mut stats = self.load();
        apply(&mut stats);
        self.save(&stats);
        stats
    }
}

impl CounterStore for FileCounterStore {
    fn read(&self) -> GuardStats {
        let _guard = self.lock.lock();
        self.load()
    }

    fn increment_prevented(&self) -> GuardStats {
        self.update(|s| s.prevented = s.prevented.saturating_add(1))
    }

    fn increment_successful(&self) -> GuardStats {
        self.update(|s| s.successful = s.successful.saturating_add(1))
    }
}
