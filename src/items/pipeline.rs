use crate::actor::VolatileTag;
use crate::items::{ComputationHolder, StackLedger, TriggerContext, TriggerPoint};
use schema::HeldItemId;
use tracing::{debug, warn};

/// What happened during one pipeline run. Informational only; callers
/// read results from the holder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub fired: Vec<HeldItemId>,
    pub consumed: Vec<HeldItemId>,
}

impl PipelineReport {
    pub fn any_fired(&self) -> bool {
        !self.fired.is_empty()
    }
}

/// Runs every effect the actor in `ctx` holds for `trigger`, in ascending
/// item id order, threading the same holder through each one. A consumable
/// effect that fires loses one stack immediately. Suppressable effects are
/// skipped while the holder carries `ItemsSuppressed`.
pub fn apply_effects(
    ledger: &mut StackLedger,
    trigger: TriggerPoint,
    ctx: &mut TriggerContext<'_>,
    holder: &mut ComputationHolder,
) -> PipelineReport {
    let actor = ctx.actor.id;
    let suppressed = ctx.actor.has_tag(VolatileTag::ItemsSuppressed);
    let mut report = PipelineReport::default();

    for (id, stack) in ledger.held_items(actor) {
        let Some(effect) = ledger.registry().get(id) else {
            warn!(%actor, item = %id, "held item missing from registry");
            continue;
        };
        if effect.descriptor.trigger != trigger {
            continue;
        }
        if suppressed && effect.descriptor.suppressable {
            debug!(%actor, item = %id, "held item suppressed");
            continue;
        }
        let consumable = effect.descriptor.consumable;
        let behavior = effect.behavior;

        if !behavior.apply(ctx, stack, holder) {
            continue;
        }
        debug!(%actor, item = %id, stack, ?trigger, "held item fired");
        report.fired.push(id);

        if consumable && ledger.consume(actor, id, 1) == 1 {
            report.consumed.push(id);
        }
    }

    report
}
