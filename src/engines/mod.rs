// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod fetcher;
pub mod rate_limiter;
pub mod session_pool;

use thiserror::Error;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 所有候选URL都失败
    #[error("All candidate URLs failed: {0}")]
    AllCandidatesFailed(String),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}
