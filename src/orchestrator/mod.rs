//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 校验配置、创建 LLM 服务
//! - 调用生成流程、导出结果
//! - 输出全局统计信息
//!
//! ### `console` - 终端答题界面
//! - 一次显示一道题
//! - 读取答案和导航命令
//! - 选择题本地核对，开放题交给批改服务
//!
//! ## 层次关系
//!
//! ```text
//! app (一次运行)
//!     ↓
//! workflow::GenerationFlow (生成 + 重试)     console (答题)
//!     ↓                                         ↓
//! services (能力层：prompt / llm / parser / grading / export)
//!     ↓
//! models (题目、科目、参考题库)
//! ```

pub mod app;
pub mod console;

pub use app::App;
pub use console::{Command, QuizConsole};
