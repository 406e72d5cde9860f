//! Instantiate the products enabled by an [`OutputSelection`].

use galaxy_atmos::Passband;
use galaxy_core::{OutputSelection, ProductKind, WindModel};
use galaxy_product::Product;

use crate::colors::ColorsProduct;
use crate::hrd::HrdProduct;
use crate::parameters::StellarParametersProduct;
use crate::quanta::QuantaProduct;
use crate::spectrum::SpectrumProduct;
use crate::supernova::SupernovaProduct;
use crate::wind::WindPowerProduct;
use crate::yields::{YieldTable, YieldsProduct};

/// An enabled output kind has no product in this crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("no product implements output '{kind}'")]
pub struct UnsupportedProduct {
    /// The kind that was requested.
    pub kind: ProductKind,
}

/// Parameters shared by the built-in products.
#[derive(Clone, Debug)]
pub struct ProductSettings {
    /// Terminal-velocity prescription for [`WindPowerProduct`].
    pub wind_model: WindModel,
    /// Bands reported by [`ColorsProduct`].
    pub passbands: Vec<Passband>,
    /// Supernova ejecta composition for [`YieldsProduct`].
    pub yield_table: YieldTable,
}

impl Default for ProductSettings {
    fn default() -> Self {
        Self {
            wind_model: WindModel::default(),
            passbands: Passband::johnson(),
            yield_table: YieldTable::default(),
        }
    }
}

/// Build one product per enabled kind, in flag order.
pub fn build_products(
    selection: OutputSelection,
    settings: &ProductSettings,
) -> Result<Vec<Box<dyn Product>>, UnsupportedProduct> {
    let mut products: Vec<Box<dyn Product>> = Vec::with_capacity(selection.len());
    for kind in selection.iter() {
        let product: Box<dyn Product> = match kind {
            ProductKind::Quanta => Box::new(QuantaProduct::new()),
            ProductKind::SupernovaRate => Box::new(SupernovaProduct::new()),
            ProductKind::Hrd => Box::new(HrdProduct::new()),
            ProductKind::WindPower => Box::new(WindPowerProduct::new(settings.wind_model)),
            ProductKind::StellarParameters => Box::new(StellarParametersProduct::new()),
            ProductKind::Yields => Box::new(YieldsProduct::new(settings.yield_table.clone())),
            ProductKind::Spectrum => Box::new(SpectrumProduct::new()),
            ProductKind::Colors => Box::new(ColorsProduct::new(settings.passbands.clone())),
            other => return Err(UnsupportedProduct { kind: other }),
        };
        tracing::debug!(kind = %kind, name = product.name(), "registered product");
        products.push(product);
    }
    Ok(products)
}
