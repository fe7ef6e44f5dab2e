use std::path::PathBuf;

use rand::seq::SliceRandom;
use rand::Rng;

/// 参考题库
///
/// 只保存题干文本，空行在加载时已经剔除
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceBank {
    /// 来源文件
    pub source: PathBuf,
    pub questions: Vec<String>,
}

impl ReferenceBank {
    pub fn new(source: impl Into<PathBuf>, questions: Vec<String>) -> Self {
        Self {
            source: source.into(),
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// 不放回地随机抽取至多 `n` 道题
    pub fn sample<R: Rng + ?Sized>(&self, n: usize, rng: &mut R) -> Vec<String> {
        self.questions
            .choose_multiple(rng, n.min(self.questions.len()))
            .cloned()
            .collect()
    }
}
