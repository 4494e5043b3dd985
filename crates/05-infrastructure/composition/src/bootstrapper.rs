//! 定位器启动器
//!
//! 负责协调启动步骤的顺序：扫描标记 → 应用配置绑定 → 注入静态槽位 → 启动单例。

use di_abstractions::{AttributeScanner, ObjectFactory, ScanReport, ServiceMarker, SkipReason, SkippedMarker};
use di_impl::{CatalogScanner, Locator};
use infrastructure_common::{short_type_name, BindingConfig, InfrastructureError, LocatorConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

/// 启动报告
#[derive(Debug, Clone, Default, Serialize)]
pub struct BootstrapReport {
    /// 标记扫描结果
    pub scan: ScanReport,
    /// 配置绑定结果
    pub bindings: ScanReport,
    /// 注入的静态槽位数量
    pub static_fields: usize,
    /// 启动时新建的单例数量
    pub executed: usize,
}

impl BootstrapReport {
    /// 是否没有跳过任何标记或绑定
    pub fn is_clean(&self) -> bool {
        self.scan.is_clean() && self.bindings.is_clean()
    }

    /// 所有被跳过的条目
    pub fn skipped(&self) -> impl Iterator<Item = &SkippedMarker> {
        self.scan.skipped.iter().chain(self.bindings.skipped.iter())
    }
}

/// 定位器启动器
pub struct Bootstrapper<'a> {
    /// 启动配置
    config: &'a LocatorConfig,
    /// 额外的标记扫描器
    scanners: &'a [Box<dyn AttributeScanner>],
}

impl<'a> Bootstrapper<'a> {
    /// 创建启动器
    pub fn new(config: &'a LocatorConfig, scanners: &'a [Box<dyn AttributeScanner>]) -> Self {
        Self { config, scanners }
    }

    /// 按顺序执行启动步骤
    pub fn run<F: ObjectFactory>(&self, locator: &mut Locator<F>) -> Result<BootstrapReport, InfrastructureError> {
        info!("开始启动服务定位器");
        let mut report = BootstrapReport::default();
        let catalog = CatalogScanner::with_modules(self.config.scan.modules.iter().cloned());

        // 第一步：扫描单例标记
        if self.config.scan.is_enabled() {
            report.scan = locator.register_singletons_from_metadata(&catalog);
            for scanner in self.scanners {
                report.scan.merge(locator.register_singletons_from_metadata(scanner.as_ref()));
            }
            info!("标记扫描完成: 注册 {} 个单例", report.scan.registered.len());
        } else {
            debug!("标记扫描已禁用");
        }

        // 第二步：应用配置中声明的绑定
        if !self.config.bindings.is_empty() {
            let mut known = CatalogScanner::new().scan();
            for scanner in self.scanners {
                known.extend(scanner.scan());
            }
            report.bindings = apply_bindings(locator, &self.config.bindings, &known);
        }

        // 第三步：注入静态槽位
        if self.config.lifecycle.inject_static_on_start {
            report.static_fields = locator.inject_static_from_catalog(&catalog)?;
        }

        // 第四步：启动全部单例
        if self.config.lifecycle.execute_on_start {
            report.executed = locator.execute_services()?;
        }

        if !report.is_clean() {
            warn!("启动时跳过了 {} 个条目", report.skipped().count());
        }
        info!("服务定位器启动完成");
        Ok(report)
    }
}

/// 按配置绑定注册服务
///
/// 每条绑定按契约与具体类型名称在已知标记中查找，生命周期以配置为准。
/// 找不到对应标记的绑定被跳过并记录在报告中。
pub fn apply_bindings<F: ObjectFactory>(
    locator: &mut Locator<F>,
    bindings: &[BindingConfig],
    known: &[ServiceMarker],
) -> ScanReport {
    let mut report = ScanReport::default();

    for binding in bindings {
        let Some(marker) = known.iter().find(|marker| {
            name_matches(marker.contract, &binding.contract) && name_matches(marker.concrete, &binding.concrete)
        }) else {
            warn!("配置绑定找不到对应标记: {} -> {}", binding.contract, binding.concrete);
            report.skipped.push(SkippedMarker {
                contract: binding.contract.clone(),
                concrete: binding.concrete.clone(),
                reason: SkipReason::UnknownMarker,
            });
            continue;
        };

        let descriptor = (marker.describe)().with_lifetime(binding.lifetime);
        info!(
            "应用配置绑定: {} -> {} [{}]",
            binding.contract, binding.concrete, binding.lifetime
        );
        report.registered.push(descriptor.contract().clone());
        locator.register(descriptor);
    }

    report
}

/// 配置中的名称可以是简短名称、完整路径或路径后缀
fn name_matches(full: &str, configured: &str) -> bool {
    let configured = configured.trim();
    let full = full.trim_start_matches("dyn ");
    let configured = configured.trim_start_matches("dyn ");
    full == configured
        || short_type_name(full) == configured
        || full
            .strip_suffix(configured)
            .is_some_and(|prefix| prefix.ends_with("::"))
}
