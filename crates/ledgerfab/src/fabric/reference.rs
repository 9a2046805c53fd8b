//! Reference data builder.
//!
//! Produces every lookup table once, before any transaction is synthesized.
//! Identifiers are sequential and zero-padded within their own namespace, so
//! they are unique per table by construction.

use chrono::{Datelike, Duration, NaiveDate};
use tracing::debug;

use super::chart_of_accounts::{build_chart, AccountBook};
use super::names;
use crate::config::FabricConfig;
use crate::error::FabricResult;
use crate::models::{
    Asset, AssetClass, Company, CostCenter, Customer, CustomerSalesArea, Employee, Equipment,
    GlAccount, Material, MaterialType, MaterialValuation, Plant, ProfitCenter, StorageStock,
    Vendor, WorkCenter,
};
use crate::random::{round_cents, FabricRng};
use crate::registry::{
    AssetNumber, CompanyCode, CostCenterId, CustomerId, EmployeeId, MaterialId, PlantId,
    ProfitCenterId, ReferenceRegistry, ReferenceTable, VendorId, WorkCenterId,
};

const CHART_KEY: &str = "INT";

const PLANT_NAMES: &[&str] = &[
    "Springfield Operations",
    "Delta Manufacturing",
    "Apex Production",
    "Global Fab",
    "East Coast Assembly",
];

const FUNCTIONS: &[&str] = &[
    "Production", "Sales", "Marketing", "Finance", "IT", "HR", "Logistics", "R&D", "Procurement",
    "Quality",
];

const PRODUCT_LINES: &[&str] = &[
    "ELECTRONICS",
    "AUTOMOTIVE",
    "INDUSTRIAL",
    "CONSUMER",
    "HEALTHCARE",
];

const UNITS: &[&str] = &["EA", "KG", "M", "LBS", "LIT", "PCS"];

const CUSTOMER_GROUPS: &[&str] = &["Retail", "Wholesale", "Distributor", "OEM", "Key Account"];

const TIERS: [(&str, f64); 3] = [("A", 0.2), ("B", 0.3), ("C", 0.5)];

const PAYMENT_TERMS: [(&str, f64); 3] = [("NET30", 0.7), ("NET45", 0.2), ("NET60", 0.1)];

/// Sales organizations shared by customer sales areas and sales orders.
pub(crate) const SALES_ORGS: [&str; 3] = ["SO01", "SO02", "SO03"];
const CHANNELS: [&str; 2] = ["DC01", "DC02"];
const DIVISIONS: [&str; 3] = ["DIV01", "DIV02", "DIV03"];

const DEPARTMENTS: &[(&str, &[&str])] = &[
    (
        "Production",
        &["Operator", "Team Lead", "Supervisor", "Production Manager"],
    ),
    ("Quality", &["QA Inspector", "Quality Engineer", "Quality Manager"]),
    (
        "Maintenance",
        &["Technician", "Maintenance Engineer", "Maintenance Supervisor"],
    ),
    ("Logistics", &["Warehouse Associate", "Logistics Coordinator"]),
    ("Operations Management", &["Plant Manager", "Operations Director"]),
    ("Sales", &["Account Executive", "Sales Manager"]),
    ("Finance", &["Accountant", "Controller"]),
    ("Safety", &["Safety Officer"]),
    ("HR", &["HR Business Partner"]),
];

const FALLBACK_TITLES: &[&str] = &["Specialist"];

const EMPLOYEE_GROUPS: &[&str] = &["Salaried", "Hourly", "Contract"];
const EMPLOYEE_SUBGROUPS: &[&str] = &["Full Time", "Part Time"];
const PERSONNEL_AREAS: &[&str] = &["PA01", "PA02", "PA03", "PA04"];

const WORK_CENTER_KINDS: &[&str] = &[
    "Cutting",
    "Molding",
    "Assembly Line A",
    "Painting Booth",
    "Packaging",
    "Welding Station",
    "CNC Machining",
];
const CAPACITY_CATEGORIES: &[&str] = &["Machine", "Labor", "Assembly"];
const MANUFACTURERS: &[&str] = &["Siemens", "ABB", "Fanuc", "KUKA", "Bosch", "GE"];

/// Currency, country and rate to USD of the companies' local currencies.
fn currency_profile(currency: &str) -> (&'static str, f64) {
    match currency {
        "USD" => ("US", 1.0),
        "EUR" => ("DE", 1.08),
        "GBP" => ("GB", 1.27),
        "CAD" => ("CA", 0.74),
        "JPY" => ("JP", 0.0068),
        "INR" => ("IN", 0.012),
        "CNY" => ("CN", 0.14),
        _ => ("US", 1.0),
    }
}

fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or(NaiveDate::MAX)
}

fn days_before(date: NaiveDate, rng: &mut FabricRng, max_days: u32) -> NaiveDate {
    date - Duration::days(i64::from(rng.range(0..=max_days)))
}

fn hierarchy(material_type: MaterialType, rng: &mut FabricRng) -> &'static str {
    let options: &[&'static str] = match material_type {
        MaterialType::Finished => &[
            "Electronics.TVs.SmartTV",
            "Electronics.Audio.Speakers",
            "Apparel.Tops.T-Shirts",
            "HomeGoods.Furniture.Chairs",
        ],
        MaterialType::Semi => &[
            "Electronics.Components.Chipsets",
            "Apparel.Fabric.CottonRolls",
            "HomeGoods.Wood.Panels",
        ],
        MaterialType::Raw => &["Metal.Aluminum", "Plastic.Pellets", "Cotton.Fiber"],
        MaterialType::Packaging => &["Box.Cardboard", "Film.Plastic"],
    };
    rng.choose(options).unwrap_or("General.Miscellaneous")
}

fn equipment_family(work_center: &str) -> &'static [&'static str] {
    if work_center.contains("CNC") {
        &["Lathe", "Mill", "Drill"]
    } else if work_center.contains("Assembly") {
        &["Robot", "Conveyor", "Workstation"]
    } else if work_center.contains("Molding") {
        &["Horizontal Molder", "Vertical Molder"]
    } else if work_center.contains("Painting") {
        &["Automated Booth", "Manual Booth"]
    } else if work_center.contains("Welding") {
        &["MIG Welder", "TIG Welder", "Arc Welder"]
    } else {
        &["Generic Equipment"]
    }
}

/// Every reference table of a run.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    /// Company codes.
    pub companies: Vec<Company>,
    /// Chart of accounts.
    pub gl_accounts: Vec<GlAccount>,
    /// Cost centers.
    pub cost_centers: Vec<CostCenter>,
    /// Profit centers.
    pub profit_centers: Vec<ProfitCenter>,
    /// Plants.
    pub plants: Vec<Plant>,
    /// Materials.
    pub materials: Vec<Material>,
    /// Valuation per material and plant, material-major.
    pub material_valuations: Vec<MaterialValuation>,
    /// Customers.
    pub customers: Vec<Customer>,
    /// Customer sales areas.
    pub customer_sales_areas: Vec<CustomerSalesArea>,
    /// Vendors.
    pub vendors: Vec<Vendor>,
    /// Employees; grows with hires.
    pub employees: Vec<Employee>,
    /// Fixed assets; grows with acquisitions.
    pub assets: Vec<Asset>,
    /// Work centers.
    pub work_centers: Vec<WorkCenter>,
    /// Equipment.
    pub equipment: Vec<Equipment>,
    /// Initial storage location stock.
    pub storage_stock: Vec<StorageStock>,
    accounts: AccountBook,
}

impl ReferenceData {
    /// Accounts indexed by subgroup.
    pub fn accounts(&self) -> &AccountBook {
        &self.accounts
    }

    /// Look up a company.
    pub fn company(&self, code: &CompanyCode) -> Option<&Company> {
        self.companies.iter().find(|c| &c.company_code == code)
    }

    /// Valuation of a material at a plant, by table position.
    pub fn valuation(&self, material: usize, plant: usize) -> Option<&MaterialValuation> {
        if plant >= self.plants.len() {
            return None;
        }
        self.material_valuations
            .get(material * self.plants.len() + plant)
    }

    /// Standard price of a material at a plant, falling back to the
    /// material's standard cost.
    pub fn standard_price(&self, material: usize, plant: usize) -> f64 {
        match self.valuation(material, plant) {
            Some(v) => v.standard_price,
            None => self.materials.get(material).map_or(0.0, |m| m.standard_cost),
        }
    }

    /// Registry of every identifier currently in the tables.
    pub fn registry(&self) -> FabricResult<ReferenceRegistry> {
        let mut registry = ReferenceRegistry::new();
        registry.register(self.companies.iter().map(|r| &r.company_code))?;
        registry.register(self.gl_accounts.iter().map(|r| &r.gl_account))?;
        registry.register(self.cost_centers.iter().map(|r| &r.cost_center))?;
        registry.register(self.profit_centers.iter().map(|r| &r.profit_center))?;
        registry.register(self.plants.iter().map(|r| &r.plant_id))?;
        registry.register(self.materials.iter().map(|r| &r.material_id))?;
        registry.register(self.customers.iter().map(|r| &r.customer_id))?;
        registry.register(self.vendors.iter().map(|r| &r.vendor_id))?;
        registry.register(self.employees.iter().map(|r| &r.employee_id))?;
        registry.register(self.assets.iter().map(|r| &r.asset_number))?;
        registry.register(self.work_centers.iter().map(|r| &r.work_center_id))?;
        Ok(registry)
    }
}

/// Fabricate one employee.
pub fn new_employee(
    number: usize,
    start_date: NaiveDate,
    cost_centers: &[CostCenter],
    companies: &[Company],
    rng: &mut FabricRng,
) -> Employee {
    let (department, titles) = rng
        .choose(DEPARTMENTS)
        .unwrap_or(("Operations Management", FALLBACK_TITLES));
    Employee {
        employee_id: EmployeeId::new(format!("EMP{number:06}")),
        employee_name: names::person_name(rng),
        department,
        job_title: rng.choose(titles).unwrap_or("Specialist"),
        employee_group: rng.choose(EMPLOYEE_GROUPS).unwrap_or("Salaried"),
        employee_subgroup: rng.choose(EMPLOYEE_SUBGROUPS).unwrap_or("Full Time"),
        personnel_area: rng.choose(PERSONNEL_AREAS).unwrap_or("PA01"),
        organizational_unit: format!("OU{:04}", rng.range(1..=50u32)),
        cost_center: rng
            .pick(cost_centers, ReferenceTable::CostCenter)
            .ok()
            .map(|c| c.cost_center.clone()),
        company_code: rng
            .pick(companies, ReferenceTable::Company)
            .ok()
            .map(|c| c.company_code.clone()),
        start_date,
        end_date: None,
    }
}

/// Fabricate one fixed asset.
pub fn new_asset(
    number: usize,
    company_code: CompanyCode,
    class: AssetClass,
    capitalization_date: NaiveDate,
    acquisition_value: f64,
) -> Asset {
    Asset {
        asset_number: AssetNumber::new(format!("A{number:07}")),
        sub_number: "0",
        company_code,
        asset_class: class,
        asset_description: format!("{} {number}", class.label()),
        capitalization_date,
        deactivation_date: None,
        acquisition_value,
    }
}

/// Builds [`ReferenceData`] from a configuration.
#[derive(Debug)]
pub struct ReferenceDataBuilder<'a> {
    config: &'a FabricConfig,
}

impl<'a> ReferenceDataBuilder<'a> {
    /// Create a builder.
    pub fn new(config: &'a FabricConfig) -> Self {
        Self { config }
    }

    /// Generate every table.
    pub fn build(&self, rng: &mut FabricRng) -> FabricResult<ReferenceData> {
        let companies = self.companies(rng);
        let gl_accounts = build_chart(self.config.organization.chart);
        let accounts = AccountBook::new(&gl_accounts);
        let cost_centers = self.cost_centers();
        let profit_centers = self.profit_centers();
        let plants = self.plants(rng);
        let materials = self.materials(rng);
        let material_valuations = self.material_valuations(&materials, &plants, rng);
        let customers = self.customers(rng);
        let customer_sales_areas = if self.config.modules.customer_sales_areas {
            self.customer_sales_areas(&customers, rng)
        } else {
            Vec::new()
        };
        let vendors = self.vendors(rng);
        let employees = self.employees(&cost_centers, &companies, rng);
        let assets = self.assets(&companies, rng)?;
        let work_centers = self.work_centers(&plants, &employees, rng);
        let equipment = self.equipment(&work_centers, rng);
        let storage_stock = if self.config.modules.storage_stock {
            self.storage_stock(&materials, &plants, rng)?
        } else {
            Vec::new()
        };

        debug!(
            companies = companies.len(),
            accounts = gl_accounts.len(),
            materials = materials.len(),
            customers = customers.len(),
            employees = employees.len(),
            assets = assets.len(),
            "Built reference data"
        );

        Ok(ReferenceData {
            companies,
            gl_accounts,
            cost_centers,
            profit_centers,
            plants,
            materials,
            material_valuations,
            customers,
            customer_sales_areas,
            vendors,
            employees,
            assets,
            work_centers,
            equipment,
            storage_stock,
            accounts,
        })
    }

    fn companies(&self, rng: &mut FabricRng) -> Vec<Company> {
        let org = &self.config.organization;
        (0..self.config.counts.companies)
            .map(|i| {
                let currency = if i == 0 || org.local_currencies.is_empty() {
                    org.group_currency.clone()
                } else {
                    org.local_currencies[(i - 1) % org.local_currencies.len()].clone()
                };
                let (country, to_usd) = currency_profile(&currency);
                let (_, group_to_usd) = currency_profile(&org.group_currency);
                Company {
                    company_code: CompanyCode::new(format!("CO{:02}", i + 1)),
                    company_name: format!("{} {country}", names::company_name(rng)),
                    country,
                    currency,
                    chart_of_accounts: CHART_KEY,
                    exchange_rate: to_usd / group_to_usd,
                }
            })
            .collect()
    }

    fn cost_centers(&self) -> Vec<CostCenter> {
        let valid_from = self.validity_start();
        (1..=self.config.counts.cost_centers)
            .map(|i| CostCenter {
                cost_center: CostCenterId::new(format!("CC{i:04}")),
                controlling_area: self.config.organization.controlling_area.clone(),
                cost_center_name: format!("{} {i}", FUNCTIONS[(i - 1) % FUNCTIONS.len()]),
                valid_from,
                valid_to: far_future(),
            })
            .collect()
    }

    fn profit_centers(&self) -> Vec<ProfitCenter> {
        let valid_from = self.validity_start();
        (1..=self.config.counts.profit_centers)
            .map(|i| ProfitCenter {
                profit_center: ProfitCenterId::new(format!("PC{i:03}")),
                controlling_area: self.config.organization.controlling_area.clone(),
                profit_center_name: format!(
                    "{} {i}",
                    PRODUCT_LINES[(i - 1) % PRODUCT_LINES.len()]
                ),
                valid_from,
                valid_to: far_future(),
            })
            .collect()
    }

    fn validity_start(&self) -> NaiveDate {
        let start = self.config.calendar.start;
        NaiveDate::from_ymd_opt(start.year() - 5, 1, 1).unwrap_or(start)
    }

    fn plants(&self, rng: &mut FabricRng) -> Vec<Plant> {
        (1..=self.config.counts.plants)
            .map(|i| {
                let place = names::place_of(rng);
                Plant {
                    plant_id: PlantId::new(format!("PL{i:02}")),
                    plant_name: format!(
                        "{} {}",
                        rng.choose(PLANT_NAMES).unwrap_or("Plant"),
                        place.city
                    ),
                    city: place.city,
                    country: place.country,
                    region: place.region,
                    is_active: true,
                }
            })
            .collect()
    }

    fn materials(&self, rng: &mut FabricRng) -> Vec<Material> {
        let types = [
            (MaterialType::Raw, 0.4),
            (MaterialType::Semi, 0.25),
            (MaterialType::Finished, 0.25),
            (MaterialType::Packaging, 0.1),
        ];
        (1..=self.config.counts.materials)
            .map(|i| {
                let material_type = rng.pick_weighted(&types).unwrap_or(MaterialType::Raw);
                Material {
                    material_id: MaterialId::new(format!("MAT{i:06}")),
                    material_description: names::product_name(rng),
                    material_type,
                    product_line: rng.choose(PRODUCT_LINES).unwrap_or("INDUSTRIAL"),
                    material_group: format!(
                        "{}{:03}",
                        names::letters(rng, 3),
                        rng.range(0..=999u32)
                    ),
                    product_hierarchy: hierarchy(material_type, rng),
                    base_unit: rng.choose(UNITS).unwrap_or("EA"),
                    standard_cost: round_cents(rng.uniform(10.0, 1000.0)),
                    currency: self.config.organization.group_currency.clone(),
                }
            })
            .collect()
    }

    fn material_valuations(
        &self,
        materials: &[Material],
        plants: &[Plant],
        rng: &mut FabricRng,
    ) -> Vec<MaterialValuation> {
        let mut rows = Vec::with_capacity(materials.len() * plants.len());
        for material in materials {
            for plant in plants {
                let standard_price = round_cents(material.standard_cost * rng.uniform(0.9, 1.1));
                rows.push(MaterialValuation {
                    material_id: material.material_id.clone(),
                    plant_id: plant.plant_id.clone(),
                    valuation_area: plant.plant_id.clone(),
                    standard_price,
                    moving_average_price: round_cents(standard_price * rng.uniform(0.95, 1.05)),
                    price_unit: 1,
                    currency: material.currency.clone(),
                });
            }
        }
        rows
    }

    fn customers(&self, rng: &mut FabricRng) -> Vec<Customer> {
        let start = self.config.calendar.start;
        (1..=self.config.counts.customers)
            .map(|i| {
                let place = names::place_of(rng);
                Customer {
                    customer_id: CustomerId::new(format!("CUST{i:06}")),
                    customer_name: names::company_name(rng),
                    customer_group: rng.choose(CUSTOMER_GROUPS).unwrap_or("Retail"),
                    customer_tier: rng.pick_weighted(&TIERS).unwrap_or("C"),
                    country: place.country,
                    region: place.region,
                    city: place.city,
                    payment_terms: rng.pick_weighted(&PAYMENT_TERMS).unwrap_or("NET30"),
                    created_date: days_before(start, rng, 1095),
                }
            })
            .collect()
    }

    fn customer_sales_areas(
        &self,
        customers: &[Customer],
        rng: &mut FabricRng,
    ) -> Vec<CustomerSalesArea> {
        customers
            .iter()
            .map(|c| CustomerSalesArea {
                customer_id: c.customer_id.clone(),
                sales_org: rng.one_of(&SALES_ORGS),
                distribution_channel: rng.one_of(&CHANNELS),
                division: rng.one_of(&DIVISIONS),
                customer_classification: c.customer_tier,
                payment_terms: c.payment_terms,
                sales_rep: format!("REP{:04}", rng.range(1..=200u32)),
            })
            .collect()
    }

    fn vendors(&self, rng: &mut FabricRng) -> Vec<Vendor> {
        (1..=self.config.counts.vendors)
            .map(|i| {
                let place = names::place_of(rng);
                Vendor {
                    vendor_id: VendorId::new(format!("VEND{i:05}")),
                    vendor_name: names::company_name(rng),
                    country: place.country,
                    city: place.city,
                }
            })
            .collect()
    }

    fn employees(
        &self,
        cost_centers: &[CostCenter],
        companies: &[Company],
        rng: &mut FabricRng,
    ) -> Vec<Employee> {
        let start = self.config.calendar.start;
        (1..=self.config.counts.employees)
            .map(|i| {
                let hired = days_before(start, rng, 5 * 365);
                new_employee(i, hired, cost_centers, companies, rng)
            })
            .collect()
    }

    fn assets(&self, companies: &[Company], rng: &mut FabricRng) -> FabricResult<Vec<Asset>> {
        let cfg = &self.config.assets;
        let cal = &self.config.calendar;
        let span_days = (cal.end - cal.start).num_days().max(0);
        let mut assets = Vec::with_capacity(self.config.counts.assets);
        for i in 1..=self.config.counts.assets {
            let company = rng.pick(companies, ReferenceTable::Company)?;
            let class = rng.choose(&AssetClass::ALL).unwrap_or(AssetClass::Machinery);
            let capitalized = days_before(cal.start, rng, cfg.capitalization_lookback_days);
            let value = rng.amount(&cfg.acquisition_value, cfg.acquisition_floor);
            let mut asset = new_asset(i, company.company_code.clone(), class, capitalized, value);
            if rng.chance(cfg.deactivation_probability) {
                asset.deactivation_date =
                    Some(cal.start + Duration::days(rng.range(0..=span_days)));
            }
            assets.push(asset);
        }
        Ok(assets)
    }

    fn work_centers(
        &self,
        plants: &[Plant],
        employees: &[Employee],
        rng: &mut FabricRng,
    ) -> Vec<WorkCenter> {
        let production: Vec<&Employee> = employees
            .iter()
            .filter(|e| e.department == "Production")
            .collect();
        let supervisors: Vec<&Employee> = if production.is_empty() {
            employees.iter().collect()
        } else {
            production
        };

        let mut rows = Vec::new();
        for plant in plants {
            for i in 1..=self.config.counts.work_centers_per_plant {
                rows.push(WorkCenter {
                    work_center_id: WorkCenterId::new(format!("{}_WC{i:03}", plant.plant_id)),
                    plant_id: plant.plant_id.clone(),
                    work_center_description: format!(
                        "{} {}",
                        rng.choose(WORK_CENTER_KINDS).unwrap_or("Assembly Line A"),
                        rng.range(1..=5u32)
                    ),
                    usage: "1",
                    capacity_category: rng.choose(CAPACITY_CATEGORIES).unwrap_or("Machine"),
                    production_supervisor_id: rng
                        .choose(&supervisors)
                        .map(|e| e.employee_id.clone()),
                });
            }
        }
        rows
    }

    fn equipment(&self, work_centers: &[WorkCenter], rng: &mut FabricRng) -> Vec<Equipment> {
        let year = self.config.calendar.start.year();
        let mut rows = Vec::new();
        for wc in work_centers {
            let family = equipment_family(&wc.work_center_description);
            for i in 1..=self.config.counts.equipment_per_work_center {
                let kind = rng.choose(family).unwrap_or("Generic Equipment");
                let code: String = kind
                    .split_whitespace()
                    .filter_map(|w| w.chars().next())
                    .collect::<String>()
                    .to_uppercase();
                rows.push(Equipment {
                    equipment_id: format!("{}_EQP{i:02}", wc.work_center_id),
                    work_center_id: wc.work_center_id.clone(),
                    plant_id: wc.plant_id.clone(),
                    manufacturer: rng.choose(MANUFACTURERS).unwrap_or("Siemens"),
                    serial_number: format!("SN-{}", rng.hex_token(10)),
                    construction_year: rng.range(year - 10..=year - 1),
                    equipment_type_desc: kind,
                    equipment_type_code: code,
                });
            }
        }
        rows
    }

    fn storage_stock(
        &self,
        materials: &[Material],
        plants: &[Plant],
        rng: &mut FabricRng,
    ) -> FabricResult<Vec<StorageStock>> {
        let org = &self.config.organization;
        let stockouts = self.config.inventory.simulate_stockouts;
        let mut rows = Vec::with_capacity(materials.len() * plants.len() * org.locations_per_plant);
        for material in materials {
            for plant in plants {
                let locations = rng.sample_distinct(
                    &org.storage_locations,
                    org.locations_per_plant,
                    ReferenceTable::Plant,
                )?;
                for location in locations {
                    let demand = f64::from(rng.range(100..=1000u32));
                    rows.push(StorageStock {
                        material_id: material.material_id.clone(),
                        plant_id: plant.plant_id.clone(),
                        storage_location: location.clone(),
                        unrestricted_stock: demand * 1.5,
                        quality_inspection: f64::from(rng.range(0..=50u32)),
                        blocked_stock: if stockouts {
                            f64::from(rng.range(0..=100u32))
                        } else {
                            0.0
                        },
                        safety_stock: (demand * 0.2).round(),
                        last_count_date: None,
                    });
                }
            }
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;
    use std::collections::HashSet;

    fn small(profile: Profile) -> FabricConfig {
        FabricConfig::for_profile(profile).with_seed(Some(9)).scaled(0.05)
    }

    #[test]
    fn test_identifiers_are_unique() {
        let config = small(Profile::FinancialControl);
        let mut rng = FabricRng::seeded(9);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();

        let customers: HashSet<_> = data.customers.iter().map(|c| &c.customer_id).collect();
        assert_eq!(customers.len(), data.customers.len());
        let assets: HashSet<_> = data.assets.iter().map(|a| &a.asset_number).collect();
        assert_eq!(assets.len(), data.assets.len());
        assert!(data.registry().is_ok());
    }

    #[test]
    fn test_first_company_uses_group_currency() {
        let config = small(Profile::FinancialControl);
        let mut rng = FabricRng::seeded(9);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();

        assert_eq!(data.companies.len(), 3);
        assert_eq!(data.companies[0].currency, "USD");
        assert_eq!(data.companies[0].exchange_rate, 1.0);
        assert_eq!(data.companies[1].currency, "EUR");
        assert_eq!(data.companies[2].currency, "INR");
        assert_eq!(data.companies[0].company_code.as_str(), "CO01");
    }

    #[test]
    fn test_valuations_are_material_major() {
        let config = small(Profile::Inventory);
        let mut rng = FabricRng::seeded(9);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();

        assert_eq!(
            data.material_valuations.len(),
            data.materials.len() * data.plants.len()
        );
        let v = data.valuation(1, 2).unwrap();
        assert_eq!(v.material_id, data.materials[1].material_id);
        assert_eq!(v.plant_id, data.plants[2].plant_id);
        assert!(data.valuation(0, data.plants.len()).is_none());
    }

    #[test]
    fn test_storage_stock_uses_distinct_locations() {
        let config = small(Profile::Inventory);
        let mut rng = FabricRng::seeded(9);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();

        let per_key = config.organization.locations_per_plant;
        assert_eq!(
            data.storage_stock.len(),
            data.materials.len() * data.plants.len() * per_key
        );
        for chunk in data.storage_stock.chunks(per_key) {
            let locations: HashSet<_> = chunk.iter().map(|s| &s.storage_location).collect();
            assert_eq!(locations.len(), per_key);
            for row in chunk {
                assert!(row.unrestricted_stock >= 150.0);
                assert!(row.safety_stock <= row.unrestricted_stock);
            }
        }
    }

    #[test]
    fn test_work_center_supervisors_from_production() {
        let config = small(Profile::Manufacturing);
        let mut rng = FabricRng::seeded(9);
        let data = ReferenceDataBuilder::new(&config).build(&mut rng).unwrap();

        assert!(!data.work_centers.is_empty());
        let production: HashSet<_> = data
            .employees
            .iter()
            .filter(|e| e.department == "Production")
            .map(|e| &e.employee_id)
            .collect();
        if !production.is_empty() {
            for wc in &data.work_centers {
                let sup = wc.production_supervisor_id.as_ref().unwrap();
                assert!(production.contains(sup));
            }
        }
        assert_eq!(
            data.equipment.len(),
            data.work_centers.len() * config.counts.equipment_per_work_center
        );
        assert!(data.equipment[0].equipment_id.ends_with("_EQP01"));
    }

    #[test]
    fn test_assets_need_a_company() {
        let mut config = small(Profile::FinancialControl);
        config.counts.companies = 0;
        let mut rng = FabricRng::seeded(9);
        assert!(ReferenceDataBuilder::new(&config).build(&mut rng).is_err());
    }
}
