//! Reference (master data) rows.

use chrono::NaiveDate;
use serde::Serialize;

use crate::registry::{
    AssetNumber, CompanyCode, CostCenterId, CustomerId, EmployeeId, ForeignKey, ForeignKeys,
    MaterialId, PlantId, ProfitCenterId, VendorId, WorkCenterId,
};

/// Company code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    /// Company code.
    pub company_code: CompanyCode,
    /// Legal name.
    pub company_name: String,
    /// ISO country code.
    pub country: &'static str,
    /// Local currency.
    pub currency: String,
    /// Chart of accounts key.
    pub chart_of_accounts: &'static str,
    /// Local-to-group currency rate.
    pub exchange_rate: f64,
}

/// Cost center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostCenter {
    /// Cost center id.
    pub cost_center: CostCenterId,
    /// Controlling area.
    pub controlling_area: String,
    /// Name.
    pub cost_center_name: String,
    /// Start of validity.
    pub valid_from: NaiveDate,
    /// End of validity.
    pub valid_to: NaiveDate,
}

/// Profit center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitCenter {
    /// Profit center id.
    pub profit_center: ProfitCenterId,
    /// Controlling area.
    pub controlling_area: String,
    /// Name.
    pub profit_center_name: String,
    /// Start of validity.
    pub valid_from: NaiveDate,
    /// End of validity.
    pub valid_to: NaiveDate,
}

/// Plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plant {
    /// Plant id.
    pub plant_id: PlantId,
    /// Name.
    pub plant_name: String,
    /// City.
    pub city: &'static str,
    /// Country.
    pub country: &'static str,
    /// Sales region.
    pub region: &'static str,
    /// Operating.
    pub is_active: bool,
}

/// Stage of a material in the production chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MaterialType {
    /// Raw material.
    Raw,
    /// Semi-finished good.
    Semi,
    /// Finished good.
    Finished,
    /// Packaging.
    Packaging,
}

/// Material master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    /// Material number.
    pub material_id: MaterialId,
    /// Description.
    pub material_description: String,
    /// Production stage.
    pub material_type: MaterialType,
    /// Product line.
    pub product_line: &'static str,
    /// Material group.
    pub material_group: String,
    /// Product hierarchy path.
    pub product_hierarchy: &'static str,
    /// Base unit of measure.
    pub base_unit: &'static str,
    /// Standard cost per unit.
    pub standard_cost: f64,
    /// Cost currency.
    pub currency: String,
}

/// Material valuation per plant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialValuation {
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Valuation area, equal to the plant.
    pub valuation_area: PlantId,
    /// Standard price.
    pub standard_price: f64,
    /// Moving average price.
    pub moving_average_price: f64,
    /// Price unit.
    pub price_unit: u32,
    /// Currency.
    pub currency: String,
}

impl ForeignKeys for MaterialValuation {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
            ForeignKey::of(&self.valuation_area),
        ]
    }
}

/// Customer master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Customer {
    /// Customer number.
    pub customer_id: CustomerId,
    /// Name.
    pub customer_name: String,
    /// Customer group.
    pub customer_group: &'static str,
    /// Service tier.
    pub customer_tier: &'static str,
    /// Country.
    pub country: &'static str,
    /// Sales region.
    pub region: &'static str,
    /// City.
    pub city: &'static str,
    /// Payment terms.
    pub payment_terms: &'static str,
    /// Creation date.
    pub created_date: NaiveDate,
}

/// Customer sales area data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSalesArea {
    /// Customer.
    pub customer_id: CustomerId,
    /// Sales organization.
    pub sales_org: &'static str,
    /// Distribution channel.
    pub distribution_channel: &'static str,
    /// Division.
    pub division: &'static str,
    /// ABC classification.
    pub customer_classification: &'static str,
    /// Payment terms.
    pub payment_terms: &'static str,
    /// Sales representative.
    pub sales_rep: String,
}

impl ForeignKeys for CustomerSalesArea {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![ForeignKey::of(&self.customer_id)]
    }
}

/// Vendor master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vendor {
    /// Vendor number.
    pub vendor_id: VendorId,
    /// Name.
    pub vendor_name: String,
    /// Country.
    pub country: &'static str,
    /// City.
    pub city: &'static str,
}

/// Employee master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Employee {
    /// Personnel number.
    pub employee_id: EmployeeId,
    /// Full name.
    pub employee_name: String,
    /// Department.
    pub department: &'static str,
    /// Job title.
    pub job_title: &'static str,
    /// Employee group.
    pub employee_group: &'static str,
    /// Employee subgroup.
    pub employee_subgroup: &'static str,
    /// Personnel area.
    pub personnel_area: &'static str,
    /// Organizational unit.
    pub organizational_unit: String,
    /// Home cost center.
    pub cost_center: Option<CostCenterId>,
    /// Employing company.
    pub company_code: Option<CompanyCode>,
    /// Hire date.
    pub start_date: NaiveDate,
    /// Termination date; `None` while employed.
    pub end_date: Option<NaiveDate>,
}

impl Employee {
    /// Still employed.
    pub fn is_active(&self) -> bool {
        self.end_date.is_none()
    }
}

impl ForeignKeys for Employee {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        let mut keys = Vec::with_capacity(2);
        keys.extend(self.cost_center.as_ref().map(ForeignKey::of));
        keys.extend(self.company_code.as_ref().map(ForeignKey::of));
        keys
    }
}

/// Fixed asset class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetClass {
    /// Buildings.
    Building,
    /// Machinery.
    Machinery,
    /// Vehicles.
    Vehicle,
    /// IT hardware.
    Computer,
    /// Furniture and fixtures.
    Furniture,
}

impl AssetClass {
    /// All classes.
    pub const ALL: [AssetClass; 5] = [
        AssetClass::Building,
        AssetClass::Machinery,
        AssetClass::Vehicle,
        AssetClass::Computer,
        AssetClass::Furniture,
    ];

    /// Straight-line annual depreciation rate.
    pub fn annual_rate(&self) -> f64 {
        match self {
            AssetClass::Building => 0.04,
            AssetClass::Machinery => 0.10,
            AssetClass::Vehicle => 0.20,
            AssetClass::Computer => 0.25,
            AssetClass::Furniture => 0.10,
        }
    }

    /// Description stem.
    pub fn label(&self) -> &'static str {
        match self {
            AssetClass::Building => "Building",
            AssetClass::Machinery => "Machinery",
            AssetClass::Vehicle => "Vehicle",
            AssetClass::Computer => "Computer",
            AssetClass::Furniture => "Furniture",
        }
    }
}

/// Fixed asset master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Asset {
    /// Asset number.
    pub asset_number: AssetNumber,
    /// Sub number.
    pub sub_number: &'static str,
    /// Owning company.
    pub company_code: CompanyCode,
    /// Asset class.
    pub asset_class: AssetClass,
    /// Description.
    pub asset_description: String,
    /// Capitalization date.
    pub capitalization_date: NaiveDate,
    /// Deactivation date, if retired.
    pub deactivation_date: Option<NaiveDate>,
    /// Acquisition value.
    pub acquisition_value: f64,
}

impl Asset {
    /// In service on a date.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.capitalization_date <= date && self.deactivation_date.map_or(true, |d| d >= date)
    }
}

impl ForeignKeys for Asset {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![ForeignKey::of(&self.company_code)]
    }
}

/// Work center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkCenter {
    /// Work center id.
    pub work_center_id: WorkCenterId,
    /// Plant.
    pub plant_id: PlantId,
    /// Description.
    pub work_center_description: String,
    /// Usage key.
    pub usage: &'static str,
    /// Capacity category.
    pub capacity_category: &'static str,
    /// Production supervisor.
    pub production_supervisor_id: Option<EmployeeId>,
}

impl ForeignKeys for WorkCenter {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        let mut keys = vec![ForeignKey::of(&self.plant_id)];
        keys.extend(self.production_supervisor_id.as_ref().map(ForeignKey::of));
        keys
    }
}

/// Piece of equipment installed at a work center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Equipment {
    /// Equipment id.
    pub equipment_id: String,
    /// Work center.
    pub work_center_id: WorkCenterId,
    /// Plant.
    pub plant_id: PlantId,
    /// Manufacturer.
    pub manufacturer: &'static str,
    /// Serial number.
    pub serial_number: String,
    /// Year built.
    pub construction_year: i32,
    /// Equipment type.
    pub equipment_type_desc: &'static str,
    /// Equipment type code.
    pub equipment_type_code: String,
}

impl ForeignKeys for Equipment {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.work_center_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}

/// Stock of one material at one storage location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageStock {
    /// Material.
    pub material_id: MaterialId,
    /// Plant.
    pub plant_id: PlantId,
    /// Storage location.
    pub storage_location: String,
    /// Unrestricted-use stock.
    pub unrestricted_stock: f64,
    /// Stock in quality inspection.
    pub quality_inspection: f64,
    /// Blocked stock.
    pub blocked_stock: f64,
    /// Safety stock.
    pub safety_stock: f64,
    /// Last physical count.
    pub last_count_date: Option<NaiveDate>,
}

impl ForeignKeys for StorageStock {
    fn foreign_keys(&self) -> Vec<ForeignKey<'_>> {
        vec![
            ForeignKey::of(&self.material_id),
            ForeignKey::of(&self.plant_id),
        ]
    }
}
