// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 分析请求数据传输对象
///
/// 封装同步分析接口的请求参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct AnalysisRequestDto {
    /// 待分析的域名列表
    #[validate(length(min = 1, message = "domains cannot be empty"))]
    pub domains: Vec<String>,
    /// 并发批量大小，服务端会压到配置的上限
    #[validate(range(min = 1, message = "batch_size is invalid"))]
    pub batch_size: Option<usize>,
    /// 单域名抓取超时时间（秒）
    pub timeout: Option<u64>,
    /// 邮箱优先规则，有序
    pub email_priority: Option<Vec<String>>,
}
