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
use uuid::Uuid;
use validator::Validate;

/// 作业提交请求数据传输对象
///
/// 封装后台作业接口的请求参数
#[derive(Debug, Deserialize, Serialize, Validate)]
pub struct JobSubmitRequestDto {
    /// 待分析的域名列表
    #[validate(length(min = 1, message = "domains cannot be empty"))]
    pub domains: Vec<String>,
    /// 作业内并发批量大小
    #[validate(range(min = 1, message = "batch_size is invalid"))]
    pub batch_size: Option<usize>,
    /// 单域名抓取超时时间（秒）
    pub timeout: Option<u64>,
    /// 作业优先级：1=低，2=普通，3=高
    #[validate(range(min = 1, max = 3, message = "priority must be between 1 and 3"))]
    pub priority: Option<i32>,
    /// 邮箱优先规则，有序
    pub email_priority: Option<Vec<String>>,
}

/// 作业提交响应数据传输对象
#[derive(Debug, Serialize, Deserialize)]
pub struct JobSubmittedDto {
    /// 作业标识符
    pub job_id: Uuid,
    /// 提交确认状态
    pub status: String,
}
