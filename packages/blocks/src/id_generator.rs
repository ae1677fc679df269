use crc32fast::Hasher;

/// Seed derived from a template name using CRC32
pub fn get_template_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential block id generator for one editing session
///
/// The counter only moves forward, so an id handed out once is never
/// produced again, even after the block carrying it was deleted.
#[derive(Debug, Clone)]
pub struct BlockIdGenerator {
    seed: String,
    count: u32,
}

impl BlockIdGenerator {
    pub fn new(template_name: &str) -> Self {
        Self {
            seed: get_template_seed(template_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("blk-{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_is_stable_per_name() {
        assert_eq!(get_template_seed("weekly"), get_template_seed("weekly"));
        assert_ne!(get_template_seed("weekly"), get_template_seed("monthly"));
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = BlockIdGenerator::new("weekly");

        let id1 = gen.new_id();
        let id2 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id1.starts_with(&format!("blk-{}", gen.seed())));
        assert_ne!(id1, id2);
    }
}
