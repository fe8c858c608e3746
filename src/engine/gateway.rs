// ==========================================
// 钢厂质检缺陷复发分析 - 数据网关接口
// ==========================================
// 职责: 定义原始事件集合的读取接口（不包含实现）
// 实现者: InspectionEventRepository（SQLite）、FileEventSource（CSV/Excel）
// ==========================================

use crate::domain::inspection::RawEventFrame;
use crate::repository::error::RepositoryResult;

// ==========================================
// InspectionEventGateway Trait
// ==========================================
pub trait InspectionEventGateway: Send + Sync {
    /// 读取全部质检事件（原始集合）
    fn fetch_inspection_events(&self) -> RepositoryResult<RawEventFrame>;

    /// 读取单个缺陷代码的质检事件
    ///
    /// 默认实现: 读取全部后由调用方过滤
    fn fetch_events_for_defect(&self, _defect_code: &str) -> RepositoryResult<RawEventFrame> {
        self.fetch_inspection_events()
    }
}
